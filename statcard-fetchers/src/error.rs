//! User-facing fetcher errors.
//!
//! Every error carries a primary message (its `Display`), an optional
//! secondary hint for the card renderer and a flag telling the renderer
//! whether to link the project repository.

use statcard_fetch::{FetchError, FetchResult};
use thiserror::Error;
use tracing::warn;

/// Default message for a missing user.
pub const USER_NOT_FOUND_MESSAGE: &str = "Could not fetch user.";

const NOT_FOUND_TYPE: &str = "NOT_FOUND";

// ============================================================================
// Error Kind
// ============================================================================

/// Stable classification of a [`FetcherError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Required parameters were not supplied.
    MissingParam,
    /// No credential is configured.
    NoCredentials,
    /// Every credential was rate limited or rejected.
    RateLimitExhausted,
    /// The account does not exist.
    UserNotFound,
    /// The GraphQL API returned an error.
    GraphQl,
    /// The all-time commit lookup failed.
    CommitsFetch,
    /// The account name failed validation.
    InvalidUsername,
    /// The repository does not exist or is private.
    RepositoryNotFound,
    /// The gist does not exist.
    GistNotFound,
    /// The WakaTime profile does not exist or is private.
    WakaTimeUserNotFound,
    /// The upstream returned something unparseable.
    UnexpectedResponse,
    /// Network failure.
    Transport,
}

// ============================================================================
// Repository Owner
// ============================================================================

/// Which owner kind resolved when a repository was not found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryOwner {
    /// Neither a user nor an organization matched.
    Unknown,
    /// A user matched, the repository did not.
    User,
    /// An organization matched, the repository did not.
    Organization,
}

impl RepositoryOwner {
    fn message(self) -> &'static str {
        match self {
            Self::Unknown => "Not found",
            Self::User => "User Repository Not found",
            Self::Organization => "Organization Repository Not found",
        }
    }
}

// ============================================================================
// Fetcher Error
// ============================================================================

/// Errors raised by the fetchers.
#[derive(Debug, Error)]
pub enum FetcherError {
    /// Required parameters were not supplied.
    #[error("Missing params {} make sure you pass the parameters in URL", quoted(.0))]
    MissingParam(Vec<String>),

    /// The account does not exist.
    #[error("{0}")]
    UserNotFound(String),

    /// Any other GraphQL error, with the upstream message.
    #[error("{0}")]
    GraphQl(String),

    /// The all-time commit lookup failed or returned no count.
    #[error("Could not fetch total commits.")]
    CommitsFetch,

    /// The account name contains characters the search API rejects.
    #[error("Invalid username provided.")]
    InvalidUsername,

    /// The repository does not exist or is private.
    #[error("{}", .0.message())]
    RepositoryNotFound(RepositoryOwner),

    /// The gist does not exist.
    #[error("Gist not found")]
    GistNotFound,

    /// The WakaTime profile could not be read.
    #[error("Could not resolve to a User with the login of '{0}'")]
    WakaTimeUserNotFound(String),

    /// The upstream response did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Credential or transport failure.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl FetcherError {
    /// Builds a [`FetcherError::MissingParam`].
    pub fn missing<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingParam(params.into_iter().map(Into::into).collect())
    }

    /// Converts the first structured error of `result`.
    ///
    /// `NOT_FOUND` becomes [`FetcherError::UserNotFound`]; anything else
    /// becomes [`FetcherError::GraphQl`], using `fallback` when the error
    /// has no message.
    pub fn from_api_errors(result: &FetchResult, fallback: &str) -> Self {
        let first = result.first_error();
        warn!(errors = ?result.errors, "Upstream returned errors");

        let message = first.and_then(|e| e.message.clone());
        match first {
            Some(error) if error.is(NOT_FOUND_TYPE) => {
                Self::UserNotFound(message.unwrap_or_else(|| USER_NOT_FOUND_MESSAGE.to_string()))
            }
            _ => Self::GraphQl(message.unwrap_or_else(|| fallback.to_string())),
        }
    }

    /// Returns the stable kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParam(_) => ErrorKind::MissingParam,
            Self::UserNotFound(_) => ErrorKind::UserNotFound,
            Self::GraphQl(_) => ErrorKind::GraphQl,
            Self::CommitsFetch => ErrorKind::CommitsFetch,
            Self::InvalidUsername => ErrorKind::InvalidUsername,
            Self::RepositoryNotFound(_) => ErrorKind::RepositoryNotFound,
            Self::GistNotFound => ErrorKind::GistNotFound,
            Self::WakaTimeUserNotFound(_) => ErrorKind::WakaTimeUserNotFound,
            Self::UnexpectedResponse(_) => ErrorKind::UnexpectedResponse,
            Self::Fetch(FetchError::NoCredentials) => ErrorKind::NoCredentials,
            Self::Fetch(FetchError::RateLimitExhausted) => ErrorKind::RateLimitExhausted,
            Self::Fetch(_) => ErrorKind::Transport,
        }
    }

    /// Hint shown below the primary message.
    pub fn secondary_message(&self) -> Option<&'static str> {
        match self.kind() {
            ErrorKind::RateLimitExhausted => {
                Some("You can deploy own instance or wait until it's reset")
            }
            ErrorKind::NoCredentials => Some(
                "Please add an env variable called PAT_1 with your GitHub API token in vercel",
            ),
            ErrorKind::UserNotFound => Some("Make sure the provided username is not an organization"),
            ErrorKind::GraphQl | ErrorKind::CommitsFetch => Some("Please try again later"),
            ErrorKind::WakaTimeUserNotFound => Some("Make sure you have a public WakaTime profile"),
            _ => None,
        }
    }

    /// Whether the rendered error should link the project repository.
    pub fn shows_repo_link(&self) -> bool {
        !matches!(self.kind(), ErrorKind::MissingParam | ErrorKind::CommitsFetch)
    }
}

fn quoted(params: &[String]) -> String {
    params
        .iter()
        .map(|p| format!("\"{p}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Tests
// ============================================================================
