//! Common types for the compilation pipeline.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::source::{Edition, EntryPoint};

use super::diagnostics::Diagnostic;

/// Configuration for the compiler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Pinned language edition
    pub edition: Edition,

    /// Optimization level (0-3)
    pub opt_level: u8,

    /// Libraries the snippet may link against
    pub link_set: LinkSet,

    /// Lints escalated to errors (`-D <lint>`), e.g. `warnings`
    pub deny_lints: Vec<String>,

    /// Additional rustc flags
    pub extra_rustc_flags: Vec<String>,

    /// Explicit rustc binary; looked up on PATH when unset
    pub rustc_path: Option<PathBuf>,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            edition: Edition::default(),
            opt_level: 3,
            link_set: LinkSet::default(),
            deny_lints: Vec::new(),
            extra_rustc_flags: Vec::new(),
            rustc_path: None,
        }
    }
}

impl CompilerConfig {
    /// Create config for fast, unoptimized builds (used by tests).
    pub fn development() -> Self {
        Self {
            opt_level: 0,
            ..Default::default()
        }
    }
}

/// The fixed set of libraries a snippet is permitted to link against.
///
/// The standard library is always available; everything else has to be
/// listed here explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkSet {
    /// Directories searched for transitive dependencies (`-L dependency=`)
    pub search_paths: Vec<PathBuf>,

    /// Crates made available by name (`--extern name=path`)
    pub externs: Vec<ExternCrate>,
}

/// A crate passed to rustc with `--extern`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternCrate {
    pub name: String,
    pub path: PathBuf,
}

impl LinkSet {
    /// The rustc arguments that make this link set visible.
    pub fn rustc_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(2 * (self.search_paths.len() + self.externs.len()));

        for path in &self.search_paths {
            args.push("-L".to_string());
            args.push(format!("dependency={}", path.display()));
        }

        for krate in &self.externs {
            args.push("--extern".to_string());
            args.push(format!("{}={}", krate.name, krate.path.display()));
        }

        args
    }
}

/// A compiled snippet, ready to be executed.
#[derive(Debug, Clone)]
pub struct Artifact {
    bytes: Vec<u8>,
    entry_point: Option<EntryPoint>,
}

impl Artifact {
    pub fn new(bytes: Vec<u8>, entry_point: Option<EntryPoint>) -> Self {
        Self { bytes, entry_point }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `None` for snippets without `main`; executing those is a no-op.
    pub fn entry_point(&self) -> Option<EntryPoint> {
        self.entry_point
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Result of compiling a source unit.
#[derive(Debug, Clone)]
pub enum CompilationOutcome {
    /// Compilation succeeded
    Success(Artifact),

    /// Compilation failed; surfaced diagnostics in emission order
    Failure(Vec<Diagnostic>),
}

impl CompilationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_set_args() {
        let link_set = LinkSet {
            search_paths: vec![PathBuf::from("/opt/libs/deps")],
            externs: vec![ExternCrate {
                name: "rand".to_string(),
                path: PathBuf::from("/opt/libs/librand.rlib"),
            }],
        };

        assert_eq!(
            link_set.rustc_args(),
            vec![
                "-L",
                "dependency=/opt/libs/deps",
                "--extern",
                "rand=/opt/libs/librand.rlib",
            ]
        );
    }

    #[test]
    fn test_default_config_is_release() {
        let config = CompilerConfig::default();
        assert_eq!(config.opt_level, 3);
        assert_eq!(config.edition, Edition::E2021);
        assert!(config.link_set.rustc_args().is_empty());
    }

    #[test]
    fn test_config_partial_json() {
        let config: CompilerConfig =
            serde_json::from_str(r#"{"edition": "2024", "deny_lints": ["warnings"]}"#).unwrap();
        assert_eq!(config.edition, Edition::E2024);
        assert_eq!(config.opt_level, 3);
        assert_eq!(config.deny_lints, vec!["warnings"]);
    }
}
