//! Static configuration for a snipbox process.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compile::CompilerConfig;
use crate::error::{Error, Result};
use crate::execute::ExecutorConfig;

/// Everything configurable, read once at startup.
///
/// Every section and field is optional; missing values take their defaults.
///
/// ```json
/// {
///   "compiler": { "edition": "2021", "deny_lints": ["warnings"] },
///   "executor": { "timeout_ms": 5000 }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SnipboxConfig {
    pub compiler: CompilerConfig,
    pub executor: ExecutorConfig,
}

impl SnipboxConfig {
    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("invalid {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make every request fail.
    pub fn validate(&self) -> Result<()> {
        if self.executor.timeout_ms == 0 {
            return Err(Error::Config("executor.timeout_ms must be positive".to_string()));
        }
        if self.compiler.opt_level > 3 {
            return Err(Error::Config(format!(
                "compiler.opt_level must be 0-3, got {}",
                self.compiler.opt_level
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Edition;

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("snipbox.json");
        fs::write(
            &path,
            r#"{"compiler": {"edition": "2024"}, "executor": {"timeout_ms": 1500}}"#,
        )
        .unwrap();

        let config = SnipboxConfig::load(&path).unwrap();
        assert_eq!(config.compiler.edition, Edition::E2024);
        assert_eq!(config.compiler.opt_level, 3);
        assert_eq!(config.executor.timeout_ms, 1500);
        assert_eq!(config.executor.max_output_bytes, 1024 * 1024);
    }

    #[test]
    fn test_empty_object_is_default() {
        let config: SnipboxConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.executor.timeout_ms, 5000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = SnipboxConfig::default();
        config.executor.timeout_ms = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = SnipboxConfig::default();
        config.compiler.opt_level = 7;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = SnipboxConfig::load("/nonexistent/snipbox.json").unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
