//! Core error types for `statcard`.

use thiserror::Error;

/// Core error type for `statcard` model operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid data, e.g. an unknown rank level label.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
