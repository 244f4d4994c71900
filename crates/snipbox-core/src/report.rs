//! Markup reports for the message sink.
//!
//! The sink understands a small HTML subset: `<b>` for bold and `<pre>` for
//! monospace. Diagnostics arrive already escaped from the compiler; program
//! output and fault messages are escaped here.

use crate::compile::{Diagnostic, escape_markup};
use crate::execute::ExecutionOutcome;

/// Markup styles the sink can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoration {
    Bold,
    Monospace,
}

/// Wrap text in the sink's markup.
pub fn decorate(text: &str, decoration: Decoration) -> String {
    match decoration {
        Decoration::Bold => format!("<b>{text}</b>"),
        Decoration::Monospace => format!("<pre>{text}</pre>"),
    }
}

/// Header line of the compile failure report.
pub const COMPILE_FAILURE_HEADER: &str = "Compilation done with errors:";

/// Render surfaced diagnostics, one monospace block each, in order.
///
/// Length is unbounded; splitting long reports is up to the sink.
pub fn render_compile_failure(diagnostics: &[Diagnostic]) -> String {
    let mut message = String::new();

    message.push_str(&decorate(COMPILE_FAILURE_HEADER, Decoration::Bold));
    message.push('\n');

    for diagnostic in diagnostics {
        let line = format!("{}: {}", diagnostic.id, diagnostic.message);
        message.push_str(&decorate(&line, Decoration::Monospace));
        message.push_str("\n\n");
    }

    message
}

/// Render the result of running a program.
pub fn render_execution(outcome: &ExecutionOutcome) -> String {
    match outcome {
        ExecutionOutcome::Completed { captured_output } => {
            titled("Result:\n", &escape_markup(captured_output))
        }
        ExecutionOutcome::Faulted { inner_message, .. } => titled(
            "Unhandled runtime exception:\n",
            &escape_markup(inner_message),
        ),
        ExecutionOutcome::TimedOut { after_millis, .. } => decorate(
            &format!("The program execution timed out after {after_millis} ms."),
            Decoration::Bold,
        ),
    }
}

fn titled(header: &str, body: &str) -> String {
    let mut message = decorate(header, Decoration::Bold);
    message.push_str(&decorate(body, Decoration::Monospace));
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_failure_layout() {
        let diagnostics = vec![
            Diagnostic::error("E0425", "cannot find value `y` in this scope"),
            Diagnostic::error("unused_variables", "unused variable: `x`"),
        ];

        assert_eq!(
            render_compile_failure(&diagnostics),
            "<b>Compilation done with errors:</b>\n\
             <pre>E0425: cannot find value `y` in this scope</pre>\n\n\
             <pre>unused_variables: unused variable: `x`</pre>\n\n"
        );
    }

    #[test]
    fn test_compile_failure_does_not_double_escape() {
        let diagnostics = vec![Diagnostic::error("E0107", "expected &lt;T&gt;")];
        assert!(render_compile_failure(&diagnostics).contains("E0107: expected &lt;T&gt;"));
    }

    #[test]
    fn test_result_report() {
        let outcome = ExecutionOutcome::Completed {
            captured_output: "Vec<u8>\n".to_string(),
        };
        assert_eq!(
            render_execution(&outcome),
            "<b>Result:\n</b><pre>Vec&lt;u8&gt;\n</pre>"
        );
    }

    #[test]
    fn test_fault_report() {
        let outcome = ExecutionOutcome::Faulted {
            inner_message: "boom".to_string(),
            partial_output: "before\n".to_string(),
        };
        assert_eq!(
            render_execution(&outcome),
            "<b>Unhandled runtime exception:\n</b><pre>boom</pre>"
        );
    }

    #[test]
    fn test_timeout_report() {
        let outcome = ExecutionOutcome::TimedOut {
            after_millis: 5000,
            partial_output: String::new(),
        };
        assert_eq!(
            render_execution(&outcome),
            "<b>The program execution timed out after 5000 ms.</b>"
        );
    }
}
