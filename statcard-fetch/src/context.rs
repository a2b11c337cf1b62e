//! Fetch context bundling credentials, transport and settings.
//!
//! Fetchers receive a [`FetchContext`] and never read the process
//! environment themselves. Build one with [`FetchContext::builder`] or
//! [`FetchContext::from_env`].

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::credentials::CredentialPool;
use crate::error::{FetchError, TransportError};
use crate::executor::{GraphQlQuery, QueryExecutor, RestQuery};
use crate::host::http::{HttpClient, Transport};
use crate::result::FetchResult;
use crate::retry::{DEGRADED_RETRY_CEILING, RetryPolicy, retry};

/// Default GraphQL endpoint.
pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// Default REST base URL.
pub const DEFAULT_REST_BASE_URL: &str = "https://api.github.com";

const MULTI_PAGE_STARS_ENV: &str = "FETCH_MULTI_PAGE_STARS";
const EXCLUDE_REPO_ENV: &str = "EXCLUDE_REPO";

// ============================================================================
// Fetch Settings
// ============================================================================

/// Settings for fetch operations.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSettings {
    /// Fixed attempt ceiling. `None` bounds retries by the pool size.
    pub retry_ceiling: Option<usize>,
    /// Whether star aggregation follows repository pages past the first.
    pub fetch_multi_page_stars: bool,
    /// Repositories excluded from every aggregation.
    pub excluded_repositories: Vec<String>,
    /// Timeout for a single request.
    pub timeout: Duration,
    /// GraphQL endpoint.
    pub graphql_url: String,
    /// REST base URL, without a trailing slash.
    pub rest_base_url: String,
    /// Domains the default HTTP client may contact. `None` allows all.
    pub allowed_domains: Option<Vec<String>>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            retry_ceiling: None,
            fetch_multi_page_stars: false,
            excluded_repositories: Vec::new(),
            timeout: Duration::from_secs(30),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            rest_base_url: DEFAULT_REST_BASE_URL.to_string(),
            allowed_domains: None,
        }
    }
}

impl FetchSettings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Reads `FETCH_MULTI_PAGE_STARS` and `EXCLUDE_REPO` through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch_multi_page_stars = lookup(MULTI_PAGE_STARS_ENV).as_deref() == Some("true");
        let excluded_repositories = lookup(EXCLUDE_REPO_ENV)
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            fetch_multi_page_stars,
            excluded_repositories,
            ..Default::default()
        }
    }

    /// Uses [`DEGRADED_RETRY_CEILING`] as the attempt bound.
    pub fn degraded(mut self) -> Self {
        self.retry_ceiling = Some(DEGRADED_RETRY_CEILING);
        self
    }

    /// Enables or disables multi-page star aggregation.
    pub fn with_multi_page_stars(mut self, enabled: bool) -> Self {
        self.fetch_multi_page_stars = enabled;
        self
    }

    /// Sets the globally excluded repositories.
    pub fn with_excluded_repositories<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_repositories = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Points the context at different API endpoints.
    pub fn with_endpoints(
        mut self,
        graphql_url: impl Into<String>,
        rest_base_url: impl Into<String>,
    ) -> Self {
        self.graphql_url = graphql_url.into();
        self.rest_base_url = rest_base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Restricts the default HTTP client to `domains`.
    pub fn with_allowed_domains(mut self, domains: Vec<String>) -> Self {
        self.allowed_domains = Some(domains);
        self
    }

    /// The retry policy these settings describe.
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            ceiling: self.retry_ceiling,
        }
    }
}

// ============================================================================
// Fetch Context
// ============================================================================

/// Immutable bundle of credential pool, query executor and settings.
///
/// Cheap to clone; concurrent fetches share the same read-only pool.
#[derive(Debug, Clone)]
pub struct FetchContext {
    pool: CredentialPool,
    executor: QueryExecutor,
    settings: Arc<FetchSettings>,
}

impl FetchContext {
    /// Creates a builder for customizing the context.
    pub fn builder() -> FetchContextBuilder {
        FetchContextBuilder::new()
    }

    /// Builds a context from `PAT_n` credentials and environment settings.
    pub fn from_env() -> Result<Self, FetchError> {
        Self::builder()
            .pool(CredentialPool::from_env())
            .settings(FetchSettings::from_env())
            .build()
    }

    /// The credential pool.
    pub fn pool(&self) -> &CredentialPool {
        &self.pool
    }

    /// The settings.
    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// The single-shot executor.
    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Runs a GraphQL query through the retry engine.
    #[instrument(skip_all)]
    pub async fn graphql(&self, query: &str, variables: &Value) -> Result<FetchResult, FetchError> {
        let request = GraphQlQuery::new(&self.executor, query, variables);
        retry(&request, &self.pool, self.settings.retry_policy()).await
    }

    /// Runs an authenticated REST GET through the retry engine.
    #[instrument(skip(self))]
    pub async fn rest_get(&self, url: &str, accept: Option<&str>) -> Result<FetchResult, FetchError> {
        let mut request = RestQuery::new(&self.executor, url);
        if let Some(accept) = accept {
            request = request.accept(accept);
        }
        retry(&request, &self.pool, self.settings.retry_policy()).await
    }

    /// Plain unauthenticated GET, outside the retry engine.
    ///
    /// Error statuses come back as a normalized result rather than an error;
    /// check [`FetchResult::is_success_status`].
    #[instrument(skip(self))]
    pub async fn get(&self, url: &str) -> Result<FetchResult, FetchError> {
        match self.executor.rest_get(url, None, None).await {
            Ok(result) => Ok(result),
            Err(TransportError::Responded { status, body }) => {
                debug!(status, "Unauthenticated request rejected");
                Ok(FetchResult::from_body(status, body))
            }
            Err(err) => Err(err.into()),
        }
    }
}

// ============================================================================
// Fetch Context Builder
// ============================================================================

/// Builder for constructing a [`FetchContext`].
#[derive(Default)]
pub struct FetchContextBuilder {
    pool: Option<CredentialPool>,
    transport: Option<Arc<dyn Transport>>,
    settings: FetchSettings,
}

impl FetchContextBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credential pool.
    pub fn pool(mut self, pool: CredentialPool) -> Self {
        self.pool = Some(pool);
        self
    }

    /// Sets the credentials from raw tokens.
    pub fn credentials<I, S>(self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.pool(CredentialPool::new(tokens))
    }

    /// Sets the transport. Defaults to an [`HttpClient`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the fetch settings.
    pub fn settings(mut self, settings: FetchSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sets the attempt ceiling.
    pub fn retry_ceiling(mut self, ceiling: usize) -> Self {
        self.settings.retry_ceiling = Some(ceiling);
        self
    }

    /// Enables or disables multi-page star aggregation.
    pub fn multi_page_stars(mut self, enabled: bool) -> Self {
        self.settings.fetch_multi_page_stars = enabled;
        self
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.settings.timeout = timeout;
        self
    }

    /// Builds the fetch context.
    ///
    /// Fails only if the default HTTP client cannot be created.
    pub fn build(self) -> Result<FetchContext, FetchError> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let client = HttpClient::with_timeout(self.settings.timeout)?;
                let client = match self.settings.allowed_domains.clone() {
                    Some(domains) => client.with_allowed_domains(domains),
                    None => client,
                };
                Arc::new(client)
            }
        };

        let pool = self.pool.unwrap_or_default();
        debug!(credentials = pool.len(), "Built fetch context");

        Ok(FetchContext {
            executor: QueryExecutor::new(transport, self.settings.graphql_url.clone()),
            pool,
            settings: Arc::new(self.settings),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_settings() {
        let settings = FetchSettings::default();
        assert_eq!(settings.retry_ceiling, None);
        assert!(!settings.fetch_multi_page_stars);
        assert!(settings.excluded_repositories.is_empty());
        assert_eq!(settings.graphql_url, DEFAULT_GRAPHQL_URL);
        assert_eq!(settings.timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_settings_from_vars() {
        let env: HashMap<&str, &str> = [
            ("FETCH_MULTI_PAGE_STARS", "true"),
            ("EXCLUDE_REPO", "repo-a, repo-b,,"),
        ]
        .into_iter()
        .collect();
        let settings = FetchSettings::from_vars(|k| env.get(k).map(|v| (*v).to_string()));

        assert!(settings.fetch_multi_page_stars);
        assert_eq!(settings.excluded_repositories, vec!["repo-a", "repo-b"]);
    }

    #[test]
    fn test_multi_page_requires_exact_true() {
        let settings = FetchSettings::from_vars(|k| {
            (k == "FETCH_MULTI_PAGE_STARS").then(|| "1".to_string())
        });
        assert!(!settings.fetch_multi_page_stars);
    }

    #[test]
    fn test_degraded_policy() {
        let settings = FetchSettings::default().degraded();
        assert_eq!(settings.retry_policy().ceiling, Some(DEGRADED_RETRY_CEILING));
    }

    #[test]
    fn test_endpoints_trim_trailing_slash() {
        let settings =
            FetchSettings::default().with_endpoints("http://localhost/graphql", "http://localhost/");
        assert_eq!(settings.rest_base_url, "http://localhost");
    }

    #[test]
    fn test_context_builder() {
        let ctx = FetchContext::builder()
            .credentials(["a", "b"])
            .multi_page_stars(true)
            .retry_ceiling(3)
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(ctx.pool().len(), 2);
        assert!(ctx.settings().fetch_multi_page_stars);
        assert_eq!(ctx.settings().retry_policy().ceiling, Some(3));
        assert_eq!(ctx.settings().timeout, Duration::from_secs(60));
        assert_eq!(ctx.executor().graphql_url(), DEFAULT_GRAPHQL_URL);
    }
}
