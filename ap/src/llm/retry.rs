//! Retry with exponential backoff
//!
//! Shared by every provider so a transient failure (network, 5xx, 429) is
//! retried the same way regardless of backend.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use super::LlmError;

/// Maximum number of retries for transient errors
pub const MAX_RETRIES: u32 = 3;

/// Initial backoff delay for retries
pub const INITIAL_BACKOFF_MS: u64 = 1000;

/// Ceiling for any single wait, including server-provided retry-after
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Check if an HTTP status code is retryable
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            initial_backoff: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_backoff: Duration::from_millis(MAX_BACKOFF_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff: Duration) -> Self {
        Self {
            max_retries,
            initial_backoff,
            ..Self::default()
        }
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Wait before retry number `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff.saturating_mul(factor).min(self.max_backoff)
    }

    /// Wait before the next attempt given the error that just happened
    ///
    /// A rate limit waits for the provider's retry-after, but never less than
    /// the regular backoff for this attempt.
    fn delay_for(&self, error: &LlmError, attempt: u32) -> Duration {
        let backoff = self.backoff(attempt);
        if error.is_rate_limit() {
            let requested = error.retry_after().unwrap_or_default();
            return requested.max(backoff).min(self.max_backoff);
        }
        backoff
    }
}

/// Run `op` until it succeeds, fails permanently, or retries run out
///
/// `op` receives the zero-based attempt number.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, LlmError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => {
                debug!(%label, attempt, "with_retry: success");
                return Ok(value);
            }
            Err(e) if e.is_retryable() && attempt < policy.max_retries => {
                attempt += 1;
                let wait = policy.delay_for(&e, attempt);
                let wait_ms = wait.as_millis() as u64;
                if e.is_rate_limit() {
                    warn!(%label, attempt, wait_ms, "with_retry: rate limited by provider, backing off");
                } else {
                    warn!(%label, attempt, wait_ms, error = %e, "with_retry: retrying after transient error");
                }
                tokio::time::sleep(wait).await;
            }
            Err(e) => {
                debug!(%label, attempt, error = %e, "with_retry: giving up");
                return Err(e);
            }
        }
    }
}
