//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
