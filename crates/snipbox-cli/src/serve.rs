//! Serve command implementation for snipbox CLI.

use snipbox_core::{Runner, SnipboxConfig};
use snipbox_server::ServerConfig;

use crate::colors;

/// Start the HTTP server.
pub async fn execute(config: SnipboxConfig, host: String, port: u16) -> anyhow::Result<()> {
    let timeout_ms = config.executor.timeout_ms;
    let edition = config.compiler.edition;
    let runner = Runner::from_config(config)?;

    println!("\n{}snipbox server{}", colors::BOLD, colors::RESET);
    println!("{}", "─".repeat(50));
    println!("{}  ◆ Edition:{} {}", colors::CYAN, colors::RESET, edition);
    println!("{}  ◆ Timeout:{} {} ms", colors::CYAN, colors::RESET, timeout_ms);
    println!(
        "{}  ◆ Endpoint:{} POST http://{}:{}/run",
        colors::CYAN,
        colors::RESET,
        host,
        port
    );
    println!("{}", "─".repeat(50));
    println!("{}Press Ctrl+C to stop{}", colors::GREEN, colors::RESET);
    println!();

    snipbox_server::serve(runner, ServerConfig { host, port }).await?;

    Ok(())
}
