//! Error types for the CookShare API

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed client input. The message goes back verbatim.
    #[error("{0}")]
    Validation(String),

    /// Admin password mismatch.
    #[error("Invalid admin password")]
    Unauthorized,

    /// Blob persistence failed. Detail stays in the logs.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}
