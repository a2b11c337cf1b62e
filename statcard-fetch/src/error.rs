//! Fetch error types.

use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for credential-rotating fetch operations.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The credential pool is empty.
    #[error("No GitHub API tokens found")]
    NoCredentials,

    /// Every attempt was rate limited or rejected.
    #[error("Downtime due to GitHub API rate limiting")]
    RateLimitExhausted,

    /// Transport failure that rotating credentials cannot fix.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

// ============================================================================
// Transport Error
// ============================================================================

/// Error raised by a [`Transport`](crate::host::http::Transport).
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// No response was received (DNS failure, connection reset, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The request failed with an HTTP error status and carried a body.
    #[error("HTTP error {status}")]
    Responded {
        /// Status code.
        status: u16,
        /// Parsed body, or the raw text as a JSON string.
        body: Value,
    },

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Domain not allowed.
    #[error("Domain not allowed: {0}")]
    DomainNotAllowed(String),

    /// Invalid header name or value.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Network(format!("Request timed out: {err}"))
        } else if err.is_connect() {
            TransportError::Network(format!("Connection failed: {err}"))
        } else {
            TransportError::Network(err.to_string())
        }
    }
}
