//! Retry policy with exponential backoff for generation API requests.

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::error::GenerationApiError;

/// Retry policy with exponential backoff.
///
/// Backoff doubles with each retry and is capped at `max_backoff_ms`.
/// Permanent errors (see `GenerationApiError::is_transient`) are never
/// retried.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of retries before giving up.
    pub max_retries: u32,

    /// Initial backoff duration in milliseconds.
    pub initial_backoff_ms: u64,

    /// Maximum backoff duration in milliseconds.
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 1_000,
            max_backoff_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff_ms,
            max_backoff_ms,
        }
    }

    /// Execute an operation with exponential backoff retry logic.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, GenerationApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, GenerationApiError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        debug!("operation succeeded after {attempt} retries");
                    }
                    return Ok(result);
                }
                Err(err) => {
                    if self.should_retry(&err, attempt) {
                        let backoff = self.calculate_backoff(attempt);
                        warn!(
                            "attempt {} failed with transient error: {err}; retrying in {backoff:?}",
                            attempt + 1
                        );
                        sleep(backoff).await;
                        attempt += 1;
                    } else {
                        if attempt >= self.max_retries {
                            warn!("operation failed after {} attempts: {err}", attempt + 1);
                        } else {
                            debug!("permanent error, not retrying: {err}");
                        }
                        return Err(err);
                    }
                }
            }
        }
    }

    /// min(initial_backoff * 2^attempt, max_backoff)
    fn calculate_backoff(&self, attempt: u32) -> Duration {
        let backoff_ms = self
            .initial_backoff_ms
            .saturating_mul(2_u64.saturating_pow(attempt))
            .min(self.max_backoff_ms);
        Duration::from_millis(backoff_ms)
    }

    fn should_retry(&self, error: &GenerationApiError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_transient()
    }
}
