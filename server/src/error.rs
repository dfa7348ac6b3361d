//! Server-level errors

use thiserror::Error;

/// Errors that stop the server as a whole
///
/// Per-connection failures never surface here; they end the affected
/// handler only (see [`crate::connection::Disconnect`]).
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Network error: {0}")]
    Io(#[from] std::io::Error),
}
