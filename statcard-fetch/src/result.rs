//! Uniform fetch result and rate-limit/credential classification.
//!
//! Every transport response, successful or not, is normalized into a
//! [`FetchResult`] by [`FetchResult::from_body`] before anything inspects
//! it. Classification only ever looks at the normalized shape.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured error type the GraphQL API uses for throttling.
pub const RATE_LIMITED_TYPE: &str = "RATE_LIMITED";

/// Messages that mean the credential itself was rejected.
pub const BAD_CREDENTIAL_MESSAGES: [&str; 2] =
    ["Bad credentials", "Sorry. Your account was suspended."];

/// Free-text rate-limit signal.
static RATE_LIMIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)rate limit").expect("Invalid regex"));

// ============================================================================
// API Error
// ============================================================================

/// One structured error from an API response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiError {
    /// Error type (e.g. `NOT_FOUND`, `RATE_LIMITED`).
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Human-readable message.
    pub message: Option<String>,
}

impl ApiError {
    /// Returns true if the error type equals `kind`.
    pub fn is(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }
}

// ============================================================================
// Signal
// ============================================================================

/// How the retry engine should treat a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The credential is throttled; rotate.
    RateLimited,
    /// The credential was rejected or its account suspended; rotate.
    BadCredential,
    /// Hand the result to the caller.
    Final,
}

impl Signal {
    /// Returns true if the credential should be rotated.
    pub fn should_rotate(self) -> bool {
        !matches!(self, Self::Final)
    }
}

// ============================================================================
// Fetch Result
// ============================================================================

/// Normalized response: payload, structured errors and status.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    /// HTTP status.
    pub status: u16,
    /// Response body, `None` when it was empty or not JSON.
    pub payload: Option<Value>,
    /// Structured errors, in response order.
    pub errors: Vec<ApiError>,
    /// Top-level message (REST error responses).
    pub message: Option<String>,
}

impl FetchResult {
    /// Normalizes a response body.
    ///
    /// Accepts both the plain body and a body nested under a `response`
    /// key (optionally with its own `data` wrapper), the shape HTTP error
    /// objects take in some clients.
    pub fn from_body(status: u16, body: Value) -> Self {
        let body = unwrap_response(body);

        let errors = body
            .get("errors")
            .and_then(|errors| serde_json::from_value::<Vec<ApiError>>(errors.clone()).ok())
            .unwrap_or_default();

        let message = body
            .get("message")
            .or_else(|| body.get("data").and_then(|data| data.get("message")))
            .and_then(Value::as_str)
            .map(str::to_string);

        let payload = if body.is_null() { None } else { Some(body) };

        Self {
            status,
            payload,
            errors,
            message,
        }
    }

    /// Builds a result with no payload, e.g. for a non-JSON body.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            payload: None,
            errors: Vec::new(),
            message: None,
        }
    }

    /// The GraphQL `data` object.
    pub fn data(&self) -> Option<&Value> {
        self.payload
            .as_ref()
            .and_then(|p| p.get("data"))
            .filter(|data| !data.is_null())
    }

    /// The first structured error.
    pub fn first_error(&self) -> Option<&ApiError> {
        self.errors.first()
    }

    /// Returns true if the response carries structured errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Returns true for 2xx statuses.
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns true for a structured `RATE_LIMITED` error or any message
    /// containing "rate limit" (case-insensitive).
    pub fn is_rate_limited(&self) -> bool {
        let structured = self.errors.iter().any(|e| e.is(RATE_LIMITED_TYPE));
        let textual = self
            .errors
            .iter()
            .filter_map(|e| e.message.as_deref())
            .chain(self.message.as_deref())
            .any(|message| RATE_LIMIT_RE.is_match(message));
        structured || textual
    }

    /// Returns true if the credential was rejected or suspended.
    pub fn is_bad_credential(&self) -> bool {
        self.message
            .as_deref()
            .is_some_and(|message| BAD_CREDENTIAL_MESSAGES.contains(&message))
    }

    /// Classifies a completed response.
    pub fn classify(&self) -> Signal {
        if self.is_rate_limited() {
            Signal::RateLimited
        } else if self.is_bad_credential() {
            Signal::BadCredential
        } else {
            Signal::Final
        }
    }

    /// Classifies a response raised as a transport error.
    ///
    /// Only credential rejection rotates here; anything else is returned
    /// to the caller as-is.
    pub fn classify_rejected(&self) -> Signal {
        if self.is_bad_credential() {
            Signal::BadCredential
        } else {
            Signal::Final
        }
    }
}

fn unwrap_response(body: Value) -> Value {
    let is_wrapper = body.get("data").is_none()
        && body.get("errors").is_none()
        && body.get("message").is_none()
        && body.get("response").is_some_and(Value::is_object);

    if !is_wrapper {
        return body;
    }

    match body {
        Value::Object(mut map) => map.remove("response").unwrap_or(Value::Null),
        other => other,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_graphql_body() {
        let result = FetchResult::from_body(200, json!({ "data": { "user": { "name": "a" } } }));
        assert_eq!(result.data().unwrap()["user"]["name"], "a");
        assert!(!result.has_errors());
        assert_eq!(result.classify(), Signal::Final);
    }

    #[test]
    fn test_structured_errors() {
        let result = FetchResult::from_body(
            200,
            json!({ "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve", "path": ["user"] }] }),
        );
        let first = result.first_error().unwrap();
        assert!(first.is("NOT_FOUND"));
        assert_eq!(first.message.as_deref(), Some("Could not resolve"));
        assert!(result.data().is_none());
    }

    #[test]
    fn test_structured_rate_limit() {
        let result = FetchResult::from_body(200, json!({ "errors": [{ "type": "RATE_LIMITED" }] }));
        assert_eq!(result.classify(), Signal::RateLimited);
    }

    #[test]
    fn test_message_rate_limit_is_case_insensitive() {
        let result = FetchResult::from_body(
            200,
            json!({ "errors": [{ "type": "ASDF", "message": "API Rate Limit already exceeded for user ID 1" }] }),
        );
        assert_eq!(result.classify(), Signal::RateLimited);
    }

    #[test]
    fn test_rate_limit_in_any_error() {
        let result = FetchResult::from_body(
            200,
            json!({ "errors": [{ "message": "first" }, { "message": "secondary rate limit hit" }] }),
        );
        assert!(result.is_rate_limited());
    }

    #[test]
    fn test_bad_credentials_direct_and_nested() {
        let direct = FetchResult::from_body(401, json!({ "message": "Bad credentials" }));
        let nested = FetchResult::from_body(401, json!({ "response": { "message": "Bad credentials" } }));
        let nested_data = FetchResult::from_body(
            401,
            json!({ "response": { "status": 401, "data": { "message": "Bad credentials" } } }),
        );
        assert_eq!(direct.classify(), Signal::BadCredential);
        assert_eq!(nested.classify(), Signal::BadCredential);
        assert_eq!(nested_data.classify(), Signal::BadCredential);
    }

    #[test]
    fn test_suspended_account() {
        let result = FetchResult::from_body(
            403,
            json!({ "message": "Sorry. Your account was suspended." }),
        );
        assert_eq!(result.classify(), Signal::BadCredential);
        assert_eq!(result.classify_rejected(), Signal::BadCredential);
    }

    #[test]
    fn test_bad_credentials_must_match_exactly() {
        let result = FetchResult::from_body(401, json!({ "message": "Bad credentials!" }));
        assert_eq!(result.classify(), Signal::Final);
    }

    #[test]
    fn test_rejected_rate_limit_is_final() {
        let result = FetchResult::from_body(403, json!({ "message": "API rate limit exceeded" }));
        assert_eq!(result.classify_rejected(), Signal::Final);
    }

    #[test]
    fn test_rest_body() {
        let result = FetchResult::from_body(200, json!({ "total_count": 1000 }));
        assert_eq!(result.payload.as_ref().unwrap()["total_count"], 1000);
        assert!(result.data().is_none());
        assert!(result.message.is_none());
    }

    #[test]
    fn test_null_body() {
        let result = FetchResult::from_body(204, Value::Null);
        assert!(result.payload.is_none());
        assert_eq!(result, FetchResult::empty(204));
    }

    #[test]
    fn test_signal_rotation() {
        assert!(Signal::RateLimited.should_rotate());
        assert!(Signal::BadCredential.should_rotate());
        assert!(!Signal::Final.should_rotate());
    }
}
