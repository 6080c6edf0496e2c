use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::errors::ApiFailure;

pub const MAX_RETRIES: u32 = 3;

/// Bounded retry for rate-limited calls. Only `ApiFailure::RateLimited` is
/// retried; every other failure is handed back after a single attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub fallback_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: MAX_RETRIES, fallback_step: Duration::from_secs(1) }
    }
}

impl RetryPolicy {
    fn delay_for(&self, attempt: u32, advised: Option<Duration>) -> Duration {
        advised.unwrap_or_else(|| self.fallback_step.saturating_mul(attempt.saturating_add(1)))
    }

    pub async fn execute<T, F, Fut>(&self, mut op: F) -> Result<T, ApiFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ApiFailure>>,
    {
        let mut attempt = 0_u32;
        loop {
            let failure = match op().await {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            let Some(advised) = failure.rate_limit_signal().map(|signal| signal.retry_after) else {
                return Err(failure);
            };

            if attempt >= self.max_retries {
                return Err(ApiFailure::RetriesExhausted {
                    retries: self.max_retries,
                    last: Box::new(failure),
                });
            }

            let delay = self.delay_for(attempt, advised);
            warn!(
                attempt = attempt + 1,
                max_retries = self.max_retries,
                delay_ms = delay.as_millis() as u64,
                "rate limited by slack; retrying"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}
