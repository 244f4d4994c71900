//! snipbox CLI - compile and sandbox-run Rust snippets.

mod check;
mod colors;
mod run;
mod serve;
mod source;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snipbox_core::{Edition, SnipboxConfig};

#[derive(Parser)]
#[command(name = "snipbox")]
#[command(about = "Compile and sandbox-run untrusted Rust snippets")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Execution time limit in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    /// Rust edition snippets are compiled with
    #[arg(long, global = true)]
    edition: Option<Edition>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile and run a snippet, printing the report
    Run {
        /// Path to the snippet, or `-` for stdin
        source: String,

        /// Print the machine-readable outcome instead of the report
        #[arg(long)]
        json: bool,
    },

    /// Compile a snippet without running it
    Check {
        /// Path to the snippet, or `-` for stdin
        source: String,
    },

    /// Start the HTTP server
    Serve {
        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

impl Cli {
    /// Config file (if any) with command-line overrides applied.
    fn load_config(&self) -> anyhow::Result<SnipboxConfig> {
        let mut config = match &self.config {
            Some(path) => SnipboxConfig::load(path)?,
            None => SnipboxConfig::default(),
        };

        if let Some(timeout_ms) = self.timeout_ms {
            config.executor.timeout_ms = timeout_ms;
        }
        if let Some(edition) = self.edition {
            config.compiler.edition = edition;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format snipbox-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<snipbox_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    let config = cli.load_config().map_err(format_error)?;

    match cli.command {
        Commands::Run { source, json } => {
            run::execute(&source, config, json).await.map_err(format_error)?;
        }

        Commands::Check { source } => {
            check::execute(&source, config).await.map_err(format_error)?;
        }

        Commands::Serve { host, port } => {
            serve::execute(config, host, port).await.map_err(format_error)?;
        }
    }

    Ok(())
}
