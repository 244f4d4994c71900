//! Error types for the snipbox server.

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configured host/port is not a socket address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// IO error (bind, accept).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
