//! Run command implementation for snipbox CLI.
//!
//! Compiles and executes one snippet, printing the same report a message
//! sink would receive.

use snipbox_core::{Reply, RunOutcome, Runner, SnipboxConfig};

use crate::colors;
use crate::source;

/// Execute a snippet.
pub async fn execute(source_arg: &str, config: SnipboxConfig, json: bool) -> anyhow::Result<()> {
    let text = source::read(source_arg)?;
    if text.trim().is_empty() {
        if json {
            println!("null");
        }
        return Ok(());
    }

    let runner = Runner::from_config(config)?;

    if json {
        return print_json(&runner, &text).await;
    }

    match runner.handle(&text).await {
        Reply::Report(report) => println!("{report}"),
        Reply::Ignored => {}
        Reply::Acknowledged => {
            eprintln!(
                "{}Request received, but it could not be processed.{} Run with --verbose for details.",
                colors::RED,
                colors::RESET
            );
        }
    }

    Ok(())
}

/// Print the raw outcome. Internal faults are real errors here.
async fn print_json(runner: &Runner, text: &str) -> anyhow::Result<()> {
    let value = match runner.run(text).await? {
        RunOutcome::CompileFailed(diagnostics) => serde_json::json!({
            "status": "compile_failed",
            "diagnostics": diagnostics,
        }),
        RunOutcome::Executed(outcome) => serde_json::to_value(&outcome)?,
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}
