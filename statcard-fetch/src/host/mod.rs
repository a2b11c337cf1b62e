//! Host APIs for statcard fetchers.
//!
//! - [`http`] - transport seam and the reqwest-backed HTTP client

pub mod http;

pub use http::{HttpClient, HttpRequest, HttpResponse, Method, Transport};
