//! Check command implementation for snipbox CLI.
//!
//! Compiles a snippet without running it.

use snipbox_core::report::render_compile_failure;
use snipbox_core::{CompilationOutcome, Runner, SnipboxConfig};

use crate::colors;
use crate::source;

/// Compile a snippet and report the result.
pub async fn execute(source_arg: &str, config: SnipboxConfig) -> anyhow::Result<()> {
    let text = source::read(source_arg)?;
    if text.trim().is_empty() {
        anyhow::bail!("Snippet is empty");
    }

    let runner = Runner::from_config(config)?;
    tracing::debug!("Checking with edition {}", runner.compiler().config().edition);

    match runner.compile(&text).await? {
        CompilationOutcome::Success(artifact) => {
            let kind = match artifact.entry_point() {
                Some(entry) => format!("{entry:?} entry point"),
                None => "no entry point".to_string(),
            };
            println!(
                "{}{}Compiled{} {} bytes ({})",
                colors::BOLD,
                colors::GREEN,
                colors::RESET,
                artifact.len(),
                kind
            );
            Ok(())
        }
        CompilationOutcome::Failure(diagnostics) => {
            print!("{}", render_compile_failure(&diagnostics));
            anyhow::bail!("{} compile error(s)", diagnostics.len())
        }
    }
}
