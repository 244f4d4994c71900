//! Toolchain discovery for snipbox compilation.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Locates the `rustc` binary and reports what it is.
#[derive(Debug, Clone)]
pub struct ToolchainManager {
    /// Path to rustc
    rustc_path: PathBuf,

    /// Toolchain version string
    version: String,
}

impl ToolchainManager {
    /// Detect rustc on PATH.
    pub fn new() -> Result<Self> {
        Self::with_rustc(None)
    }

    /// Use an explicit rustc binary, falling back to PATH when `None`.
    pub fn with_rustc(rustc_path: Option<&Path>) -> Result<Self> {
        let rustc_path = match rustc_path {
            Some(path) => path.to_path_buf(),
            None => Self::find_rustc()?,
        };
        let version = Self::get_rustc_version(&rustc_path)?;

        tracing::debug!("Using {} at {}", version, rustc_path.display());

        Ok(Self {
            rustc_path,
            version,
        })
    }

    /// Get the rustc path.
    pub fn rustc_path(&self) -> &Path {
        &self.rustc_path
    }

    /// Get the toolchain version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Find rustc in PATH.
    fn find_rustc() -> Result<PathBuf> {
        which::which("rustc")
            .map_err(|_| Error::Toolchain("rustc not found in PATH".to_string()))
    }

    /// Get rustc version string.
    fn get_rustc_version(rustc: &Path) -> Result<String> {
        let output = Command::new(rustc)
            .arg("--version")
            .output()
            .map_err(|e| {
                Error::Toolchain(format!("Failed to run {}: {}", rustc.display(), e))
            })?;

        if !output.status.success() {
            return Err(Error::Toolchain(format!(
                "{} --version exited with {}",
                rustc.display(),
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toolchain_detection() {
        if which::which("rustc").is_err() {
            return;
        }

        let manager = ToolchainManager::new().unwrap();
        assert!(manager.version().starts_with("rustc "));
        assert!(manager.rustc_path().exists());
    }

    #[test]
    fn test_missing_binary_is_toolchain_error() {
        let err = ToolchainManager::with_rustc(Some(Path::new("/nonexistent/rustc"))).unwrap_err();
        assert!(matches!(err, Error::Toolchain(_)));
    }
}
