//! snipbox HTTP front door.
//!
//! A thin transport over [`snipbox_core::Runner`]:
//! - `POST /run` with `{"source": "..."}` answers `{"reply": "..." | null}`
//! - `GET /health` answers `{"status": "ok"}`
//!
//! The transport is fail-soft: internal faults, and even panics in a
//! handler, still answer `200` with a `null` reply, so the caller only
//! learns that the request was received.

pub mod error;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use snipbox_core::Runner;

pub use error::{ServerError, ServerResult};
pub use routes::{AppState, RunRequest, RunResponse, create_router};

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Serve `runner` until Ctrl+C.
pub async fn serve(runner: Runner, config: ServerConfig) -> ServerResult<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", config.host, config.port)))?;

    let app = create_router(Arc::new(AppState { runner }));

    tracing::info!("Starting snipbox server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Received shutdown signal");
            }
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
    }
}
