//! Shared helpers: a scripted in-memory transport and upstream fixtures.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use statcard_fetch::{FetchContext, HttpRequest, HttpResponse, Transport, TransportError};

type Handler = dyn Fn(&HttpRequest, usize) -> Result<HttpResponse, TransportError> + Send + Sync;

/// Answers requests through a closure and records every request.
///
/// The closure receives the request and its 0-based call index.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Arc<Self>
    where
        F: Fn(&HttpRequest, usize) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            handler: Box::new(handler),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.handler)(&request, index)
    }
}

/// Replies like a real HTTP client: non-2xx statuses are raised.
pub fn reply(status: u16, body: Value) -> Result<HttpResponse, TransportError> {
    if (200..300).contains(&status) {
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        })
    } else {
        Err(TransportError::Responded { status, body })
    }
}

pub fn ok(body: Value) -> Result<HttpResponse, TransportError> {
    reply(200, body)
}

pub fn context(transport: &Arc<ScriptedTransport>, multi_page: bool) -> FetchContext {
    context_with(transport, &["token"], multi_page)
}

pub fn context_with(
    transport: &Arc<ScriptedTransport>,
    tokens: &[&str],
    multi_page: bool,
) -> FetchContext {
    FetchContext::builder()
        .credentials(tokens.iter().copied())
        .transport(transport.clone())
        .multi_page_stars(multi_page)
        .build()
        .unwrap()
}

// ============================================================================
// Request inspection
// ============================================================================

pub fn query(request: &HttpRequest) -> &str {
    request
        .body
        .as_ref()
        .and_then(|body| body["query"].as_str())
        .unwrap_or_default()
}

pub fn variables(request: &HttpRequest) -> Value {
    request
        .body
        .as_ref()
        .map(|body| body["variables"].clone())
        .unwrap_or(Value::Null)
}

pub fn is_profile_query(request: &HttpRequest) -> bool {
    query(request).contains("totalCommitContributions")
}

pub fn is_commit_search(request: &HttpRequest) -> bool {
    request.url.contains("search/commits")
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn repo_nodes(stars: &[(&str, u64)]) -> Value {
    stars
        .iter()
        .map(|(name, count)| json!({ "name": name, "stargazers": { "totalCount": count } }))
        .collect()
}

pub fn profile() -> Value {
    json!({
        "data": {
            "user": {
                "name": "Kartikey Mahawar",
                "repositoriesContributedTo": { "totalCount": 61 },
                "commits": { "totalCommitContributions": 100 },
                "reviews": { "totalPullRequestReviewContributions": 50 },
                "pullRequests": { "totalCount": 300 },
                "mergedPullRequests": { "totalCount": 240 },
                "openIssues": { "totalCount": 100 },
                "closedIssues": { "totalCount": 100 },
                "followers": { "totalCount": 100 },
                "repositoryDiscussions": { "totalCount": 10 },
                "repositoryDiscussionComments": { "totalCount": 40 },
                "repositories": {
                    "totalCount": 5,
                    "nodes": repo_nodes(&[("test-repo-1", 100), ("test-repo-2", 100), ("test-repo-3", 100)]),
                    "pageInfo": { "hasNextPage": true, "endCursor": "cursor" }
                }
            }
        }
    })
}

pub fn repos_page(stars: &[(&str, u64)], has_next_page: bool, cursor: &str) -> Value {
    json!({
        "data": {
            "user": {
                "repositories": {
                    "nodes": repo_nodes(stars),
                    "pageInfo": { "hasNextPage": has_next_page, "endCursor": cursor }
                }
            }
        }
    })
}

pub fn not_found(message: &str) -> Value {
    json!({
        "errors": [{ "type": "NOT_FOUND", "path": ["user"], "locations": [], "message": message }]
    })
}
