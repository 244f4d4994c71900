//! Common types for sandboxed execution.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Wall-clock budget for one execution unless configured otherwise.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Configuration for the sandboxed executor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Wall-clock limit per execution, in milliseconds
    pub timeout_ms: u64,

    /// Bytes kept per output stream; the rest is drained and dropped
    pub max_output_bytes: usize,

    /// Parent directory for isolation units (system temp dir when unset)
    pub work_root: Option<PathBuf>,

    /// `PATH` seen by the executed program
    pub path_env: String,

    /// How long to keep reading output after the program has exited,
    /// in milliseconds
    pub drain_grace_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_output_bytes: 1024 * 1024,
            work_root: None,
            path_env: "/usr/local/bin:/usr/bin:/bin".to_string(),
            drain_grace_ms: 250,
        }
    }
}

impl ExecutorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn drain_grace(&self) -> Duration {
        Duration::from_millis(self.drain_grace_ms)
    }
}

/// How one execution ended.
///
/// Output written before a timeout or fault is kept; partial output is
/// expected, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// The program ran to completion.
    Completed { captured_output: String },

    /// The program exceeded its time budget and was killed.
    TimedOut {
        after_millis: u64,
        partial_output: String,
    },

    /// The program panicked or exited unsuccessfully.
    Faulted {
        inner_message: String,
        partial_output: String,
    },
}

impl ExecutionOutcome {
    /// Whatever the program wrote to stdout, regardless of how it ended.
    pub fn captured_output(&self) -> &str {
        match self {
            Self::Completed { captured_output } => captured_output,
            Self::TimedOut { partial_output, .. } | Self::Faulted { partial_output, .. } => {
                partial_output
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout() {
        let config = ExecutorConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(5000));
        assert!(config.work_root.is_none());
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = ExecutionOutcome::TimedOut {
            after_millis: 5000,
            partial_output: "tick\n".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "timed_out");
        assert_eq!(json["after_millis"], 5000);
        assert_eq!(outcome.captured_output(), "tick\n");
    }
}
