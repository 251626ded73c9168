//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid block ID: {0}")]
    InvalidBlockId(String),

    #[error("invalid tenant ID: {0}")]
    InvalidTenant(String),

    #[error("{0} is not allowed")]
    ReservedFileName(String),

    #[error("invalid path: {0:?}")]
    InvalidFilePath(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
