//! All-time commit count lookup through the commit search API.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use statcard_fetch::FetchContext;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::FetcherError;

/// Media type the commit search endpoint requires.
pub const COMMIT_SEARCH_ACCEPT: &str = "application/vnd.github.cloak-preview";

/// Characters the search API accepts in an `author:` qualifier.
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid regex"));

/// Checks `login` against the characters the search API accepts.
pub fn validate_username(login: &str) -> Result<(), FetcherError> {
    if USERNAME_RE.is_match(login) {
        Ok(())
    } else {
        Err(FetcherError::InvalidUsername)
    }
}

/// Fetches the all-time commit count of `login`.
///
/// A response without a numeric `total_count`, including an HTTP error
/// response, is reported as [`FetcherError::CommitsFetch`]. Credential and
/// network failures pass through as [`FetcherError::Fetch`].
#[instrument(skip(ctx))]
pub async fn fetch_total_commits(ctx: &FetchContext, login: &str) -> Result<u64, FetcherError> {
    validate_username(login)?;

    let mut url = Url::parse(&format!("{}/search/commits", ctx.settings().rest_base_url))
        .map_err(|e| FetcherError::UnexpectedResponse(e.to_string()))?;
    url.set_query(Some(&format!("q=author:{login}")));

    let result = ctx.rest_get(url.as_str(), Some(COMMIT_SEARCH_ACCEPT)).await?;

    let total = result
        .payload
        .as_ref()
        .and_then(|body| body.get("total_count"))
        .and_then(Value::as_u64);

    match total {
        Some(total) => {
            debug!(total, "Fetched all-time commits");
            Ok(total)
        }
        None => {
            warn!(payload = ?result.payload, "Commit search returned no total");
            Err(FetcherError::CommitsFetch)
        }
    }
}
