//! The sandboxed executor.

use std::time::{Duration, Instant};

use crate::compile::Artifact;
use crate::error::{Error, Result};

use super::capture::OutputCapture;
use super::fault::innermost_message;
use super::types::{ExecutionOutcome, ExecutorConfig};
use super::unit::IsolationUnit;

/// Runs artifacts in isolation units under a wall-clock limit.
///
/// Holds no per-execution state, so one executor can serve any number of
/// concurrent executions.
#[derive(Debug, Clone, Default)]
pub struct SandboxExecutor {
    config: ExecutorConfig,
}

impl SandboxExecutor {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Execute with the configured timeout.
    pub async fn execute(&self, artifact: &Artifact) -> Result<ExecutionOutcome> {
        self.execute_with_timeout(artifact, self.config.timeout()).await
    }

    /// Execute an artifact in a fresh isolation unit.
    ///
    /// `Ok` covers everything the program itself can do (finish, fail,
    /// hang). `Err` means the sandbox could not do its job.
    pub async fn execute_with_timeout(
        &self,
        artifact: &Artifact,
        timeout: Duration,
    ) -> Result<ExecutionOutcome> {
        if artifact.entry_point().is_none() {
            tracing::debug!("Artifact has no entry point, nothing to run");
            return Ok(ExecutionOutcome::Completed {
                captured_output: String::new(),
            });
        }

        let unit = IsolationUnit::load(artifact.bytes(), self.config.work_root.as_deref())?;
        let outcome = self.run_in_unit(&unit, timeout).await;

        match unit.release() {
            Ok(()) => outcome,
            Err(release_err) => match outcome {
                Ok(_) => Err(release_err),
                Err(run_err) => {
                    tracing::error!("{}", release_err);
                    Err(run_err)
                }
            },
        }
    }

    async fn run_in_unit(&self, unit: &IsolationUnit, timeout: Duration) -> Result<ExecutionOutcome> {
        let start = Instant::now();
        let mut child = unit.spawn(&self.config.path_env).await?;
        let pid = child.id();

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::ArtifactLoad("failed to get program stdout".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::ArtifactLoad("failed to get program stderr".to_string()))?;

        let limit = self.config.max_output_bytes;
        let stdout = OutputCapture::spawn(stdout, limit);
        let stderr = OutputCapture::spawn(stderr, limit);

        let waited = tokio::time::timeout(timeout, child.wait()).await;

        // Anything the program forked dies with it, whatever the outcome.
        kill_group(pid);

        let status = match waited {
            Ok(status) => Some(status?),
            Err(_) => {
                tracing::debug!("Program exceeded {:?}, killed process group", timeout);
                if let Err(e) = child.kill().await {
                    tracing::warn!("Failed to kill program: {}", e);
                }
                None
            }
        };

        let grace = self.config.drain_grace();
        let stdout = stdout.finish(grace).await?;
        let stderr = stderr.finish(grace).await?;
        let output = stdout.to_string_lossy();

        tracing::debug!(
            "Program finished in {}ms ({} bytes of output{})",
            start.elapsed().as_millis(),
            stdout.bytes.len(),
            if stdout.truncated { ", truncated" } else { "" }
        );

        let outcome = match status {
            None => ExecutionOutcome::TimedOut {
                after_millis: timeout.as_millis() as u64,
                partial_output: output,
            },
            Some(status) if status.success() => ExecutionOutcome::Completed {
                captured_output: output,
            },
            Some(status) => ExecutionOutcome::Faulted {
                inner_message: innermost_message(&stderr.to_string_lossy(), status),
                partial_output: output,
            },
        };

        Ok(outcome)
    }
}

/// SIGKILL the program's process group.
///
/// The program leads its own group, so this reaches everything it forked
/// even after the program itself has been reaped.
fn kill_group(pid: Option<u32>) {
    #[cfg(unix)]
    if let Some(pid) = pid {
        let rc = unsafe { libc::killpg(pid as libc::pid_t, libc::SIGKILL) };
        if rc != 0 {
            let err = std::io::Error::last_os_error();
            // ESRCH: the group is already empty.
            if err.raw_os_error() != Some(libc::ESRCH) {
                tracing::warn!("Failed to kill process group {}: {}", pid, err);
            }
        }
    }

    #[cfg(not(unix))]
    let _ = pid;
}
