//! Retry policy for transient request failures.
//!
//! A rate-limited response waits at least as long as the server asked for;
//! network failures wait on an exponential schedule. Every other error ends
//! the request on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Attempts after the first one. Zero disables retrying.
    pub max_retries: u32,
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub(crate) fn new(max_retries: u32, backoff_base_secs: u64) -> Self {
        Self {
            max_retries,
            backoff_base: Duration::from_secs(backoff_base_secs),
        }
    }

    /// `backoff_base * 2^retry`, saturating.
    fn backoff(&self, retry: u32) -> Duration {
        let factor = 1u32.checked_shl(retry).unwrap_or(u32::MAX);
        self.backoff_base.saturating_mul(factor)
    }

    /// How long to wait before retry number `retry` (0-based) after `err`,
    /// or `None` when `err` should be returned as is.
    pub(crate) fn delay_after(&self, retry: u32, err: &ScraperError) -> Option<Duration> {
        if retry >= self.max_retries {
            return None;
        }
        match err {
            ScraperError::RateLimited {
                retry_after_secs, ..
            } => Some(Duration::from_secs(*retry_after_secs).max(self.backoff(retry))),
            ScraperError::Http(_) => Some(self.backoff(retry)),
            _ => None,
        }
    }

    /// Runs `request` until it succeeds or [`RetryPolicy::delay_after`]
    /// gives up, sleeping between attempts.
    pub(crate) async fn run<T, F, Fut>(&self, mut request: F) -> Result<T, ScraperError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ScraperError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match request().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            let Some(delay) = self.delay_after(retry, &err) else {
                return Err(err);
            };
            tracing::warn!(
                retry = retry + 1,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "request failed, waiting before retry"
            );
            tokio::time::sleep(delay).await;
            retry += 1;
        }
    }
}
