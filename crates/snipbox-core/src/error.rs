//! Error types for snipbox-core.
//!
//! Compile errors and runtime faults of user code are not errors here: they
//! are ordinary values of [`crate::CompilationOutcome`] and
//! [`crate::ExecutionOutcome`]. Everything in [`Error`] is an internal fault
//! that the [`crate::Runner`] boundary logs and swallows.

use std::path::PathBuf;

use thiserror::Error;

/// Result type for snipbox-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Internal faults that can occur in snipbox-core.
#[derive(Debug, Error)]
pub enum Error {
    /// The compiler toolchain is missing or misbehaved.
    #[error("toolchain error: {0}")]
    Toolchain(String),

    /// The artifact could not be placed into an isolation unit or started.
    #[error("failed to load artifact: {0}")]
    ArtifactLoad(String),

    /// An isolation unit could not be released.
    #[error("failed to release isolation unit at {path}: {message}")]
    Teardown { path: PathBuf, message: String },

    /// Configuration could not be read or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// A background task died unexpectedly.
    #[error("task failed: {0}")]
    Task(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Render the error together with a recovery hint, if one applies.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Self::Toolchain(_) => {
                Some("install a Rust toolchain or point `compiler.rustc_path` at rustc")
            }
            Self::ArtifactLoad(_) => {
                Some("check that the work root is writable and not mounted noexec")
            }
            Self::Teardown { .. } => Some("remove the directory manually and check permissions"),
            Self::Config(_) => Some("the config file is JSON; every section and field is optional"),
            Self::Task(_) | Self::Io(_) => None,
        };

        match hint {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_is_appended() {
        let err = Error::Toolchain("rustc not found in PATH".to_string());
        let rendered = err.with_hint();
        assert!(rendered.starts_with("toolchain error: rustc not found in PATH"));
        assert!(rendered.contains("hint:"));
    }

    #[test]
    fn test_io_has_no_hint() {
        let err = Error::from(std::io::Error::other("disk on fire"));
        assert_eq!(err.with_hint(), "IO error: disk on fire");
    }
}
