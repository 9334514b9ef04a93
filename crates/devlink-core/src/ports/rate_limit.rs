//! Rate limiting port.

use std::time::Duration;

/// Rate limiter trait - decides per client key whether a request may proceed.
pub trait RateLimiter: Send + Sync {
    /// Record one request for `key` and report whether it is allowed.
    fn check(&self, key: &str) -> Result<RateDecision, RateLimitError>;
}

/// Outcome of a rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
