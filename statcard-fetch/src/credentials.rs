//! API credential pool.
//!
//! Credentials are read once at startup and never mutated afterwards.
//!
//! ## Indexing
//!
//! Slots are 0-based everywhere in this crate: slot 0 is the credential
//! read from `PAT_1`, slot 1 from `PAT_2`, and so on. Log lines name the
//! 0-based slot.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

/// Environment variable prefix for credentials (`PAT_1`, `PAT_2`, ...).
pub const CREDENTIAL_ENV_PREFIX: &str = "PAT_";

// ============================================================================
// Credential
// ============================================================================

/// An opaque API token.
///
/// `Debug` is redacted so tokens never reach logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(Arc<str>);

impl Credential {
    /// Wraps a token.
    pub fn new(token: impl AsRef<str>) -> Self {
        Self(Arc::from(token.as_ref()))
    }

    /// Returns the raw token.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns the value for an `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("bearer {}", self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

// ============================================================================
// Credential Pool
// ============================================================================

/// Ordered, immutable list of credentials.
///
/// Cloning is cheap; all clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct CredentialPool {
    credentials: Arc<[Credential]>,
}

impl CredentialPool {
    /// Creates a pool from tokens, in order.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            credentials: tokens.into_iter().map(Credential::new).collect(),
        }
    }

    /// Loads `PAT_1`, `PAT_2`, ... from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Loads `PAT_1`, `PAT_2`, ... through `lookup`, stopping at the first
    /// missing or empty variable.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let tokens: Vec<String> = (1..)
            .map(|n| lookup(&format!("{CREDENTIAL_ENV_PREFIX}{n}")))
            .take_while(|value| value.as_deref().is_some_and(|v| !v.is_empty()))
            .flatten()
            .collect();

        debug!(count = tokens.len(), "Loaded API credentials");
        Self::new(tokens)
    }

    /// Number of credentials.
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Returns true if no credential is configured.
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Returns the credential for an attempt.
    ///
    /// Attempts past the end wrap around to slot 0, so a fixed attempt
    /// ceiling larger than the pool keeps cycling in pool order.
    pub fn for_attempt(&self, attempt: usize) -> Option<&Credential> {
        if self.credentials.is_empty() {
            return None;
        }
        self.credentials.get(attempt % self.credentials.len())
    }

    /// Returns the credential in `slot`, without wrapping.
    pub fn get(&self, slot: usize) -> Option<&Credential> {
        self.credentials.get(slot)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_from_vars_in_order() {
        let env = vars(&[("PAT_1", "a"), ("PAT_2", "b"), ("PAT_3", "c")]);
        let pool = CredentialPool::from_vars(|k| env.get(k).cloned());
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(0).unwrap().expose(), "a");
        assert_eq!(pool.get(2).unwrap().expose(), "c");
    }

    #[test]
    fn test_from_vars_stops_at_gap() {
        let env = vars(&[("PAT_1", "a"), ("PAT_3", "c")]);
        let pool = CredentialPool::from_vars(|k| env.get(k).cloned());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_from_vars_empty_value_ends_pool() {
        let env = vars(&[("PAT_1", "a"), ("PAT_2", ""), ("PAT_3", "c")]);
        let pool = CredentialPool::from_vars(|k| env.get(k).cloned());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn test_empty_pool() {
        let pool = CredentialPool::from_vars(|_| None);
        assert!(pool.is_empty());
        assert!(pool.for_attempt(0).is_none());
    }

    #[test]
    fn test_for_attempt_wraps() {
        let pool = CredentialPool::new(["a", "b"]);
        assert_eq!(pool.for_attempt(0).unwrap().expose(), "a");
        assert_eq!(pool.for_attempt(1).unwrap().expose(), "b");
        assert_eq!(pool.for_attempt(2).unwrap().expose(), "a");
        assert!(pool.get(2).is_none());
    }

    #[test]
    fn test_debug_is_redacted() {
        let pool = CredentialPool::new(["ghp_secret"]);
        let debug = format!("{pool:?}");
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("redacted"));
    }

    #[test]
    fn test_bearer() {
        assert_eq!(Credential::new("abc").bearer(), "bearer abc");
    }
}
