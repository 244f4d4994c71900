//! The runner: compile, execute, report.
//!
//! `Runner::handle` is the outer boundary. Compile errors, runtime faults
//! and timeouts become reports; internal faults are logged in full and
//! answered with a bare acknowledgement.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::compile::{CompilationOutcome, Compiler, Diagnostic};
use crate::config::SnipboxConfig;
use crate::error::{Error, Result};
use crate::execute::{ExecutionOutcome, SandboxExecutor};
use crate::report;

/// What happened to one snippet.
#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// The snippet did not compile
    CompileFailed(Vec<Diagnostic>),

    /// The snippet compiled and was executed
    Executed(ExecutionOutcome),
}

impl RunOutcome {
    /// Markup report for the message sink.
    pub fn render(&self) -> String {
        match self {
            Self::CompileFailed(diagnostics) => report::render_compile_failure(diagnostics),
            Self::Executed(outcome) => report::render_execution(outcome),
        }
    }
}

/// Answer to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A report to deliver to the user
    Report(String),

    /// Nothing to do (blank source)
    Ignored,

    /// The request was received but failed internally; details are in the
    /// server log only
    Acknowledged,
}

impl Reply {
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Report(text) => Some(text),
            Self::Ignored | Self::Acknowledged => None,
        }
    }
}

/// Compiles and executes snippets.
#[derive(Clone)]
pub struct Runner {
    compiler: Arc<Compiler>,
    executor: SandboxExecutor,
}

impl Runner {
    pub fn new(compiler: Compiler, executor: SandboxExecutor) -> Self {
        Self {
            compiler: Arc::new(compiler),
            executor,
        }
    }

    /// Runner backed by rustc.
    pub fn from_config(config: SnipboxConfig) -> Result<Self> {
        config.validate()?;
        let compiler = Compiler::rustc(config.compiler)?;
        Ok(Self::new(compiler, SandboxExecutor::new(config.executor)))
    }

    pub fn compiler(&self) -> &Compiler {
        &self.compiler
    }

    pub fn executor(&self) -> &SandboxExecutor {
        &self.executor
    }

    /// Compile on the blocking pool.
    pub async fn compile(&self, source: &str) -> Result<CompilationOutcome> {
        let compiler = Arc::clone(&self.compiler);
        let unit = compiler.source_unit(source);

        tokio::task::spawn_blocking(move || compiler.compile(&unit))
            .await
            .map_err(|e| Error::Task(format!("compilation task: {e}")))?
    }

    /// Compile and, if that worked, execute.
    pub async fn run(&self, source: &str) -> Result<RunOutcome> {
        match self.compile(source).await? {
            CompilationOutcome::Failure(diagnostics) => Ok(RunOutcome::CompileFailed(diagnostics)),
            CompilationOutcome::Success(artifact) => {
                let outcome = self.executor.execute(&artifact).await?;
                Ok(RunOutcome::Executed(outcome))
            }
        }
    }

    /// Handle one request. Never fails.
    pub async fn handle(&self, source: &str) -> Reply {
        if source.trim().is_empty() {
            return Reply::Ignored;
        }

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("run", %request_id);

        async {
            match self.run(source).await {
                Ok(outcome) => {
                    tracing::info!("{}", summarize(&outcome));
                    Reply::Report(outcome.render())
                }
                Err(e) => {
                    tracing::error!("Internal fault: {:?}", e);
                    Reply::Acknowledged
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn summarize(outcome: &RunOutcome) -> String {
    match outcome {
        RunOutcome::CompileFailed(diagnostics) => {
            format!("compile failed ({} diagnostics)", diagnostics.len())
        }
        RunOutcome::Executed(ExecutionOutcome::Completed { captured_output }) => {
            format!("completed ({} bytes)", captured_output.len())
        }
        RunOutcome::Executed(ExecutionOutcome::TimedOut { after_millis, .. }) => {
            format!("timed out after {after_millis}ms")
        }
        RunOutcome::Executed(ExecutionOutcome::Faulted { .. }) => "faulted".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::{BuildOutput, BuildRequest, CompilerBackend, CompilerConfig};

    struct FailingBackend;

    impl CompilerBackend for FailingBackend {
        fn build(&self, _request: &BuildRequest<'_>) -> Result<BuildOutput> {
            Ok(BuildOutput {
                artifact: None,
                diagnostics: vec![Diagnostic::error("E0308", "expected <T>")],
            })
        }
    }

    struct BrokenBackend;

    impl CompilerBackend for BrokenBackend {
        fn build(&self, _request: &BuildRequest<'_>) -> Result<BuildOutput> {
            Err(Error::Toolchain("secret path /opt/rustc missing".to_string()))
        }
    }

    fn runner(backend: impl CompilerBackend + 'static) -> Runner {
        Runner::new(
            Compiler::new(Arc::new(backend), CompilerConfig::default()),
            SandboxExecutor::default(),
        )
    }

    #[tokio::test]
    async fn test_blank_source_is_ignored() {
        assert_eq!(runner(BrokenBackend).handle(" \n ").await, Reply::Ignored);
    }

    #[tokio::test]
    async fn test_compile_failure_report() {
        let reply = runner(FailingBackend).handle("fn main() {}").await;
        let text = reply.text().unwrap();
        assert!(text.starts_with("<b>Compilation done with errors:</b>"));
        assert!(text.contains("<pre>E0308: expected &lt;T&gt;</pre>"));
    }

    #[tokio::test]
    async fn test_internal_fault_is_acknowledged_without_detail() {
        let reply = runner(BrokenBackend).handle("fn main() {}").await;
        assert_eq!(reply, Reply::Acknowledged);
        assert_eq!(reply.text(), None);
    }

    #[tokio::test]
    async fn test_run_surfaces_internal_fault() {
        let err = runner(BrokenBackend).run("fn main() {}").await.unwrap_err();
        assert!(matches!(err, Error::Toolchain(_)));
    }
}
