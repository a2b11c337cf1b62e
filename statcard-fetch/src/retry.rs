//! Credential-rotating retry engine.
//!
//! A request is attempted with slot 0 of the [`CredentialPool`]. When the
//! response says the credential is throttled or rejected, the engine moves
//! to the next slot and tries again, strictly sequentially. Attempts are
//! bounded: with `max_attempts` = pool size (or the fixed ceiling), at most
//! `max_attempts + 1` attempts are made before giving up with
//! [`FetchError::RateLimitExhausted`].
//!
//! Network failures without a response are returned immediately; another
//! credential would not help.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::credentials::{Credential, CredentialPool};
use crate::error::{FetchError, TransportError};
use crate::result::{FetchResult, Signal};

/// Fixed attempt ceiling used in degraded/test mode.
pub const DEGRADED_RETRY_CEILING: usize = 7;

// ============================================================================
// Retryable Request
// ============================================================================

/// One request that can be replayed with different credentials.
#[async_trait]
pub trait RetryableRequest: Send + Sync {
    /// Performs one attempt with `credential`.
    ///
    /// `attempt` is the 0-based attempt index, which is also the 0-based
    /// pool slot until the pool wraps.
    async fn attempt(
        &self,
        credential: &Credential,
        attempt: usize,
    ) -> Result<FetchResult, TransportError>;
}

// ============================================================================
// Retry Policy
// ============================================================================

/// Bounds for the retry engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Fixed attempt ceiling. `None` uses the pool size.
    pub ceiling: Option<usize>,
}

impl RetryPolicy {
    /// Uses the pool size as the bound.
    pub fn pool_sized() -> Self {
        Self { ceiling: None }
    }

    /// Uses [`DEGRADED_RETRY_CEILING`] regardless of pool size.
    pub fn degraded() -> Self {
        Self {
            ceiling: Some(DEGRADED_RETRY_CEILING),
        }
    }

    /// Returns `max_attempts` for `pool`.
    pub fn max_attempts(&self, pool: &CredentialPool) -> usize {
        self.ceiling.unwrap_or_else(|| pool.len())
    }
}

// ============================================================================
// Retry Engine
// ============================================================================

/// Outcome of one attempt after normalization.
enum Attempt {
    /// The request completed with a response.
    Completed(FetchResult),
    /// The transport raised on an error status but carried a response.
    Rejected(FetchResult),
}

impl Attempt {
    fn normalize(result: Result<FetchResult, TransportError>) -> Result<Self, TransportError> {
        match result {
            Ok(result) => Ok(Self::Completed(result)),
            Err(TransportError::Responded { status, body }) => {
                Ok(Self::Rejected(FetchResult::from_body(status, body)))
            }
            Err(err) => Err(err),
        }
    }

    fn signal(&self) -> Signal {
        match self {
            Self::Completed(result) => result.classify(),
            Self::Rejected(result) => result.classify_rejected(),
        }
    }

    fn into_result(self) -> FetchResult {
        match self {
            Self::Completed(result) | Self::Rejected(result) => result,
        }
    }
}

/// Runs `request`, rotating credentials on rate limiting or rejection.
///
/// # Errors
///
/// - [`FetchError::NoCredentials`] if the pool is empty (nothing is attempted)
/// - [`FetchError::RateLimitExhausted`] after `max_attempts + 1` rotations
/// - [`FetchError::Transport`] for failures without a response
pub async fn retry<R>(
    request: &R,
    pool: &CredentialPool,
    policy: RetryPolicy,
) -> Result<FetchResult, FetchError>
where
    R: RetryableRequest + ?Sized,
{
    retry_from(request, pool, policy, 0).await
}

/// Like [`retry`], starting at attempt `start`.
#[instrument(skip(request, pool), fields(pool_size = pool.len()))]
pub async fn retry_from<R>(
    request: &R,
    pool: &CredentialPool,
    policy: RetryPolicy,
    start: usize,
) -> Result<FetchResult, FetchError>
where
    R: RetryableRequest + ?Sized,
{
    if pool.is_empty() {
        return Err(FetchError::NoCredentials);
    }

    let max_attempts = policy.max_attempts(pool);

    for attempt in start..=max_attempts {
        let Some(credential) = pool.for_attempt(attempt) else {
            return Err(FetchError::NoCredentials);
        };

        debug!(attempt, "Attempting request");
        let outcome = Attempt::normalize(request.attempt(credential, attempt).await)?;

        let signal = outcome.signal();
        if !signal.should_rotate() {
            return Ok(outcome.into_result());
        }
        warn!(slot = attempt % pool.len(), reason = ?signal, "Credential failed, rotating");
    }

    warn!(max_attempts, "All credentials exhausted");
    Err(FetchError::RateLimitExhausted)
}

// ============================================================================
// Tests
// ============================================================================
