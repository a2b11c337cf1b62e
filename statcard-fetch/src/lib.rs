// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Statcard Fetch
//!
//! Credential-rotating data acquisition for statcard.
//!
//! ## Layers
//!
//! - [`credentials::CredentialPool`] - ordered, immutable API tokens
//! - [`retry`] - rotates credentials on rate limiting or rejection
//! - [`executor::QueryExecutor`] - single-shot GraphQL/REST requests
//! - [`result::FetchResult`] - uniform response shape and classification
//! - [`host::http`] - the [`Transport`] seam and [`HttpClient`]
//! - [`context::FetchContext`] - everything above, bundled with settings
//!
//! ## Example
//!
//! ```ignore
//! use statcard_fetch::FetchContext;
//!
//! let ctx = FetchContext::from_env()?;
//! let result = ctx.graphql("query { viewer { login } }", &serde_json::json!({})).await?;
//! ```

// Core modules
pub mod context;
pub mod credentials;
pub mod error;
pub mod executor;
pub mod host;
pub mod result;
pub mod retry;

// Re-export key types at crate root

// Errors
pub use error::{FetchError, TransportError};

// Host APIs
pub use host::http::{HttpClient, HttpRequest, HttpResponse, Method, Transport};

// Credentials & retry
pub use credentials::{Credential, CredentialPool};
pub use result::{ApiError, FetchResult, Signal};
pub use retry::{DEGRADED_RETRY_CEILING, RetryPolicy, RetryableRequest, retry, retry_from};

// Execution & context
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use executor::{GraphQlQuery, QueryExecutor, RestQuery};
