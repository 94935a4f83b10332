//! # Rate-Limit Retry
//!
//! Exponential backoff that only retries [`AppError::RateLimited`]. Every other
//! error is returned on the spot.

use std::future::Future;
use std::time::Duration;

use lib_core::{AppError, Config, Result};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total calls, including the first one.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_attempts: config.retry_max_attempts.max(1),
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }

    /// Delay after the `attempt`-th failed call (1-based): `base × 2^(attempt - 1)`.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Run `op`, retrying rate-limited failures per `policy`.
pub async fn with_rate_limit_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        match op().await {
            Ok(value) => return Ok(value),
            Err(AppError::RateLimited(msg)) if attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(operation, attempt, ?delay, "Rate limited, retrying: {}", msg);
                tokio::time::sleep(delay).await;
            }
            Err(AppError::RateLimited(msg)) => {
                warn!(operation, attempt, "Rate limited, giving up");
                return Err(AppError::RateLimited(format!("Max retries reached: {}", msg)));
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_on_third_attempt_with_growing_delays() {
        // Arrange
        let calls = Arc::new(AtomicU32::new(0));
        let call_times = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let policy = RetryPolicy::default();

        // Act
        let result = with_rate_limit_retry(&policy, "test", || {
            let calls = Arc::clone(&calls);
            let call_times = Arc::clone(&call_times);
            async move {
                call_times.lock().push(Instant::now());
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                if n < 3 {
                    Err(AppError::RateLimited("429 Too Many Requests".to_string()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        // Assert
        assert_eq!(result.unwrap(), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let times = call_times.lock();
        let first_gap = times[1] - times[0];
        let second_gap = times[2] - times[1];
        assert_eq!(first_gap, Duration::from_millis(1000));
        assert_eq!(second_gap, Duration::from_millis(2000));
        assert!(second_gap > first_gap);
    }

    #[test]
    fn test_first_retry_waits_the_base_delay() {
        let policy = RetryPolicy {
            max_attempts: 5,
            base_delay: Duration::from_millis(250),
        };
        assert_eq!(policy.delay_after(1), Duration::from_millis(250));
        assert_eq!(policy.delay_after(2), Duration::from_millis(500));
        assert_eq!(policy.delay_after(4), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_rate_limit_retry(&RetryPolicy::default(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::Rpc("connection refused".to_string())) }
        })
        .await;

        assert!(matches!(result, Err(AppError::Rpc(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_surfaces_rate_limit() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = with_rate_limit_retry(&RetryPolicy::default(), "test", || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(AppError::RateLimited("429".to_string())) }
        })
        .await;

        assert!(result.unwrap_err().is_rate_limited());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
