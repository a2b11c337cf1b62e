//! Single-shot query execution.
//!
//! The [`QueryExecutor`] issues exactly one request per call and normalizes
//! whatever comes back into a [`FetchResult`]. It never retries; wrap it in
//! [`GraphQlQuery`] or [`RestQuery`] to run it through the retry engine.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{debug, instrument};

use crate::credentials::Credential;
use crate::error::TransportError;
use crate::host::http::{HttpRequest, Transport};
use crate::result::FetchResult;
use crate::retry::RetryableRequest;

/// Executes GraphQL and REST requests over a [`Transport`].
#[derive(Clone)]
pub struct QueryExecutor {
    transport: Arc<dyn Transport>,
    graphql_url: String,
}

impl QueryExecutor {
    /// Creates an executor posting GraphQL queries to `graphql_url`.
    pub fn new(transport: Arc<dyn Transport>, graphql_url: impl Into<String>) -> Self {
        Self {
            transport,
            graphql_url: graphql_url.into(),
        }
    }

    /// The GraphQL endpoint.
    pub fn graphql_url(&self) -> &str {
        &self.graphql_url
    }

    /// Posts `{query, variables}` with `credential`.
    #[instrument(skip_all)]
    pub async fn graphql(
        &self,
        query: &str,
        variables: &Value,
        credential: &Credential,
    ) -> Result<FetchResult, TransportError> {
        let body = json!({ "query": query, "variables": variables });
        let request = HttpRequest::post_json(&self.graphql_url, body)
            .header("Authorization", credential.bearer());
        self.execute(request).await
    }

    /// GETs a REST resource, authenticated when `credential` is given.
    #[instrument(skip(self, credential))]
    pub async fn rest_get(
        &self,
        url: &str,
        accept: Option<&str>,
        credential: Option<&Credential>,
    ) -> Result<FetchResult, TransportError> {
        let mut request = HttpRequest::get(url);
        if let Some(accept) = accept {
            request = request.header("Accept", accept);
        }
        if let Some(credential) = credential {
            request = request.header("Authorization", format!("token {}", credential.expose()));
        }
        self.execute(request).await
    }

    async fn execute(&self, request: HttpRequest) -> Result<FetchResult, TransportError> {
        let response = self.transport.send(request).await?;
        debug!(status = response.status, "Normalizing response");
        Ok(FetchResult::from_body(
            response.status,
            response.json().unwrap_or(Value::Null),
        ))
    }
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("graphql_url", &self.graphql_url)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Retryable Requests
// ============================================================================

/// A GraphQL query bound to an executor.
#[derive(Debug)]
pub struct GraphQlQuery<'a> {
    executor: &'a QueryExecutor,
    query: &'a str,
    variables: &'a Value,
}

impl<'a> GraphQlQuery<'a> {
    /// Binds `query` and `variables` to `executor`.
    pub fn new(executor: &'a QueryExecutor, query: &'a str, variables: &'a Value) -> Self {
        Self {
            executor,
            query,
            variables,
        }
    }
}

#[async_trait]
impl<'a> RetryableRequest for GraphQlQuery<'a> {
    async fn attempt(
        &self,
        credential: &Credential,
        _attempt: usize,
    ) -> Result<FetchResult, TransportError> {
        self.executor
            .graphql(self.query, self.variables, credential)
            .await
    }
}

/// An authenticated REST GET bound to an executor.
#[derive(Debug)]
pub struct RestQuery<'a> {
    executor: &'a QueryExecutor,
    url: &'a str,
    accept: Option<&'a str>,
}

impl<'a> RestQuery<'a> {
    /// Binds `url` to `executor`.
    pub fn new(executor: &'a QueryExecutor, url: &'a str) -> Self {
        Self {
            executor,
            url,
            accept: None,
        }
    }

    /// Sets the `Accept` header.
    pub fn accept(mut self, accept: &'a str) -> Self {
        self.accept = Some(accept);
        self
    }
}

#[async_trait]
impl<'a> RetryableRequest for RestQuery<'a> {
    async fn attempt(
        &self,
        credential: &Credential,
        _attempt: usize,
    ) -> Result<FetchResult, TransportError> {
        self.executor
            .rest_get(self.url, self.accept, Some(credential))
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
