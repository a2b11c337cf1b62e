//! WakaTime stats.
//!
//! WakaTime is public and unauthenticated, so this goes straight to the
//! transport without credentials or retries.

use statcard_core::WakaTimeStats;
use statcard_fetch::FetchContext;
use tracing::{instrument, warn};

use crate::error::FetcherError;

/// Default WakaTime API domain.
pub const DEFAULT_WAKATIME_DOMAIN: &str = "wakatime.com";

/// Builds the stats URL for `username` on `api_domain`.
pub fn wakatime_stats_url(username: &str, api_domain: Option<&str>) -> String {
    let domain = api_domain
        .map(|domain| domain.trim_end_matches('/'))
        .filter(|domain| !domain.is_empty())
        .unwrap_or(DEFAULT_WAKATIME_DOMAIN);
    format!("https://{domain}/api/v1/users/{username}/stats?is_including_today=true")
}

/// Fetches the WakaTime stats of `username`.
#[instrument(skip(ctx))]
pub async fn fetch_wakatime_stats(
    ctx: &FetchContext,
    username: &str,
    api_domain: Option<&str>,
) -> Result<WakaTimeStats, FetcherError> {
    if username.is_empty() {
        return Err(FetcherError::missing(["username"]));
    }

    let result = ctx.get(&wakatime_stats_url(username, api_domain)).await?;
    if !result.is_success_status() {
        warn!(status = result.status, "WakaTime profile unavailable");
        return Err(FetcherError::WakaTimeUserNotFound(username.to_string()));
    }

    let data = result
        .payload
        .and_then(|mut body| body.get_mut("data").map(serde_json::Value::take))
        .ok_or_else(|| FetcherError::UnexpectedResponse("Missing WakaTime data".to_string()))?;

    serde_json::from_value(data).map_err(|e| FetcherError::UnexpectedResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_domain() {
        assert_eq!(
            wakatime_stats_url("octocat", None),
            "https://wakatime.com/api/v1/users/octocat/stats?is_including_today=true"
        );
    }

    #[test]
    fn test_custom_domain_trailing_slash() {
        assert_eq!(
            wakatime_stats_url("octocat", Some("hackatime.example.org/")),
            "https://hackatime.example.org/api/v1/users/octocat/stats?is_including_today=true"
        );
    }
}
