//! HTTP transport with tracing and domain allowlist.
//!
//! The [`Transport`] trait is the only place network I/O happens. The
//! reqwest-backed [`HttpClient`] behaves like a classic HTTP client library:
//! non-2xx statuses are raised as [`TransportError::Responded`], carrying the
//! parsed body, while failures without any response are raised as
//! [`TransportError::Network`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use crate::error::{FetchError, TransportError};

/// Default request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent string for statcard.
const USER_AGENT: &str = concat!("statcard/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Request & Response
// ============================================================================

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET.
    Get,
    /// POST.
    Post,
}

/// A transport-agnostic HTTP request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Extra headers.
    pub headers: Vec<(String, String)>,
    /// JSON body for POST requests.
    pub body: Option<Value>,
}

impl HttpRequest {
    /// Creates a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Creates a POST request with a JSON body.
    pub fn post_json(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body),
        }
    }

    /// Adds a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Returns the value of the first header named `name` (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A received HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Status code.
    pub status: u16,
    /// Response headers.
    pub headers: Vec<(String, String)>,
    /// Raw body.
    pub body: String,
}

impl HttpResponse {
    /// Parses the body as JSON, or `None` if it is not JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_str(&self.body).ok()
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// ============================================================================
// Transport
// ============================================================================

/// Sends one HTTP request.
///
/// Implementations must not retry: rotation and recovery live in the
/// retry engine.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` and returns the response.
    ///
    /// Returns [`TransportError::Responded`] for non-2xx responses and
    /// [`TransportError::Network`] when no response was received.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// reqwest-backed [`Transport`] with tracing and an optional domain allowlist.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    allowed_domains: Option<Vec<String>>,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            inner: client,
            allowed_domains: None,
        })
    }

    /// Restricts requests to the given domains and their subdomains.
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// Checks if a URL's domain is allowed.
    fn is_domain_allowed(&self, url: &str) -> Result<(), TransportError> {
        let parsed = Url::parse(url).map_err(|e| TransportError::InvalidUrl(e.to_string()))?;

        let Some(ref allowed) = self.allowed_domains else {
            return Ok(()); // No restrictions
        };

        let host = parsed
            .host_str()
            .ok_or_else(|| TransportError::InvalidUrl("No host in URL".to_string()))?;

        let allowed = allowed
            .iter()
            .any(|domain| host == domain || host.ends_with(&format!(".{domain}")));

        if allowed {
            Ok(())
        } else {
            Err(TransportError::DomainNotAllowed(host.to_string()))
        }
    }

    fn build_headers(request: &HttpRequest) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &request.headers {
            let name = reqwest::header::HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidHeader(e.to_string()))?;
            let value = reqwest::header::HeaderValue::from_str(value)
                .map_err(|e| TransportError::InvalidHeader(e.to_string()))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

#[async_trait]
impl Transport for HttpClient {
    #[instrument(skip(self, request), fields(url = %request.url, method = ?request.method))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.is_domain_allowed(&request.url)?;
        let headers = Self::build_headers(&request)?;

        let builder = match request.method {
            Method::Get => self.inner.get(&request.url),
            Method::Post => self.inner.post(&request.url),
        };
        let builder = match request.body {
            Some(ref body) => builder.json(body),
            None => builder,
        };

        debug!("Sending request");
        let response = builder.headers(headers).send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.text().await?;
        debug!(status, "Response received");

        let response = HttpResponse {
            status,
            headers,
            body,
        };

        if response.is_success() {
            Ok(response)
        } else {
            let body = response
                .json()
                .unwrap_or_else(|| Value::String(response.body.clone()));
            Err(TransportError::Responded { status, body })
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_allowlist() {
        let client = HttpClient::new()
            .unwrap()
            .with_allowed_domains(vec!["api.github.com".to_string(), "wakatime.com".to_string()]);

        // Allowed domains
        assert!(client.is_domain_allowed("https://api.github.com/graphql").is_ok());
        assert!(client.is_domain_allowed("https://wakatime.com/api/v1/users/x/stats").is_ok());

        // Subdomain matching
        assert!(client.is_domain_allowed("https://eu.wakatime.com").is_ok());

        // Not allowed
        assert!(matches!(
            client.is_domain_allowed("https://evil.com/steal"),
            Err(TransportError::DomainNotAllowed(_))
        ));
    }

    #[test]
    fn test_no_domain_restrictions() {
        let client = HttpClient::new().unwrap();
        assert!(client.is_domain_allowed("https://any.domain.com").is_ok());
    }

    #[test]
    fn test_invalid_url() {
        let client = HttpClient::new().unwrap();
        assert!(matches!(
            client.is_domain_allowed("not-a-valid-url"),
            Err(TransportError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_request_builder_headers() {
        let request = HttpRequest::get("https://api.github.com/search/commits")
            .header("Accept", "application/vnd.github.cloak-preview");
        assert_eq!(request.method, Method::Get);
        assert_eq!(
            request.header_value("accept"),
            Some("application/vnd.github.cloak-preview")
        );
        assert!(request.header_value("authorization").is_none());
    }

    #[test]
    fn test_response_json() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: r#"{"total_count": 5}"#.to_string(),
        };
        assert!(response.is_success());
        assert_eq!(response.json().unwrap()["total_count"], 5);

        let html = HttpResponse {
            status: 502,
            headers: Vec::new(),
            body: "<html>bad gateway</html>".to_string(),
        };
        assert!(!html.is_success());
        assert!(html.json().is_none());
    }
}
