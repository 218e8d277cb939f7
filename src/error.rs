//! Error types for the life tracker
//!
//! All errors use thiserror for structured error handling.
//! Every error is local and recoverable; none aborts the process.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Item not found: {0}")]
    NotFound(i64),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
