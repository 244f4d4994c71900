//! Compiler diagnostics: parsing rustc JSON output and deciding what the
//! user gets to see.

use serde::{Deserialize, Serialize};

/// A single compiler diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Error code (e.g., "E0308"), lint name, or the level name when the
    /// compiler gave no code
    pub id: String,

    /// Severity level
    pub severity: Severity,

    /// Message text
    pub message: String,

    /// A warning promoted to an error by configuration (`-D <lint>`)
    pub is_escalated_warning: bool,
}

/// Severity level of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Diagnostic {
    pub fn error(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            severity: Severity::Error,
            message: message.into(),
            is_escalated_warning: false,
        }
    }

    pub fn warning(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(id, message)
        }
    }

    /// Whether this diagnostic makes the compilation fail from the user's
    /// point of view.
    pub fn is_surfaced(&self) -> bool {
        self.severity == Severity::Error || self.is_escalated_warning
    }
}

/// Escape the characters the message sink would treat as markup.
pub fn escape_markup(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// Rustc JSON diagnostic format.
#[derive(Debug, Deserialize)]
struct RustcDiagnostic {
    message: String,
    code: Option<RustcCode>,
    level: String,
}

#[derive(Debug, Deserialize)]
struct RustcCode {
    code: String,
}

/// Parse `rustc --error-format=json` output into diagnostics, keeping
/// emission order.
pub fn parse_rustc_output(json_output: &str) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    for line in json_output.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<RustcDiagnostic>(line) {
            Ok(raw) => {
                if is_summary(&raw) {
                    continue;
                }
                diagnostics.push(map_diagnostic(raw));
            }
            Err(e) => {
                tracing::debug!(
                    "Failed to parse rustc JSON: {} (line: {})",
                    e,
                    truncate(line, 100)
                );
            }
        }
    }

    diagnostics
}

fn map_diagnostic(raw: RustcDiagnostic) -> Diagnostic {
    let severity = match raw.level.as_str() {
        "error" | "error: internal compiler error" => Severity::Error,
        "warning" => Severity::Warning,
        _ => Severity::Info,
    };

    let code = raw.code.map(|c| c.code);
    let is_escalated_warning =
        severity == Severity::Error && code.as_deref().is_some_and(is_lint_name);

    Diagnostic {
        id: code.unwrap_or(raw.level),
        severity,
        message: raw.message,
        is_escalated_warning,
    }
}

/// The compiler's closing "aborting due to N previous errors" line.
fn is_summary(raw: &RustcDiagnostic) -> bool {
    raw.code.is_none() && raw.message.starts_with("aborting due to")
}

/// Lints are named (`unused_variables`); hard errors carry `E` + 4 digits.
fn is_lint_name(code: &str) -> bool {
    let is_error_code = code.len() == 5
        && code.starts_with('E')
        && code[1..].bytes().all(|b| b.is_ascii_digit());
    !is_error_code
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MISMATCH: &str = r#"{"$message_type":"diagnostic","message":"mismatched types","code":{"code":"E0308","explanation":"..."},"level":"error","spans":[],"children":[],"rendered":"error[E0308]: mismatched types"}"#;
    const UNUSED: &str = r#"{"$message_type":"diagnostic","message":"unused variable: `x`","code":{"code":"unused_variables","explanation":null},"level":"warning","spans":[],"children":[],"rendered":"warning: unused variable"}"#;
    const DENIED: &str = r#"{"$message_type":"diagnostic","message":"unused variable: `x`","code":{"code":"unused_variables","explanation":null},"level":"error","spans":[],"children":[],"rendered":"error: unused variable"}"#;
    const SYNTAX: &str = r#"{"$message_type":"diagnostic","message":"expected `;`, found `}`","code":null,"level":"error","spans":[],"children":[],"rendered":"error: expected `;`"}"#;
    const ABORT: &str = r#"{"$message_type":"diagnostic","message":"aborting due to 2 previous errors","code":null,"level":"error","spans":[],"children":[],"rendered":"error: aborting due to 2 previous errors"}"#;
    const NOTE: &str = r#"{"$message_type":"diagnostic","message":"For more information about this error, try `rustc --explain E0308`.","code":null,"level":"failure-note","spans":[],"children":[],"rendered":"For more information"}"#;

    #[test]
    fn test_parse_keeps_emission_order() {
        let output = [SYNTAX, UNUSED, MISMATCH].join("\n");
        let diagnostics = parse_rustc_output(&output);

        let ids: Vec<_> = diagnostics.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["error", "unused_variables", "E0308"]);
    }

    #[test]
    fn test_severity_mapping() {
        let output = [MISMATCH, UNUSED, NOTE].join("\n");
        let diagnostics = parse_rustc_output(&output);

        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[1].severity, Severity::Warning);
        assert_eq!(diagnostics[2].severity, Severity::Info);
        assert_eq!(diagnostics[2].id, "failure-note");
    }

    #[test]
    fn test_denied_lint_is_escalated() {
        let diagnostics = parse_rustc_output(DENIED);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_escalated_warning);
        assert!(diagnostics[0].is_surfaced());

        let hard = parse_rustc_output(MISMATCH);
        assert!(!hard[0].is_escalated_warning);
    }

    #[test]
    fn test_summary_and_garbage_are_skipped() {
        let output = format!("{MISMATCH}\nnot json at all\n\n{ABORT}\n");
        let diagnostics = parse_rustc_output(&output);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].id, "E0308");
    }

    #[test]
    fn test_plain_warning_not_surfaced() {
        assert!(!Diagnostic::warning("unused_variables", "unused").is_surfaced());
        assert!(Diagnostic::error("E0425", "cannot find value").is_surfaced());
    }

    #[test]
    fn test_escape_markup() {
        assert_eq!(escape_markup("expected <T>"), "expected &lt;T&gt;");
        assert_eq!(escape_markup("a && b"), "a && b");
    }

    #[test]
    fn test_lint_name_detection() {
        assert!(!is_lint_name("E0308"));
        assert!(is_lint_name("unused_variables"));
        assert!(is_lint_name("clippy::needless_return"));
        assert!(is_lint_name("E03"));
    }
}
