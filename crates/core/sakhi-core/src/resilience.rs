//! Retry logic for external calls

use crate::Result;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retries after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Backoff multiplier
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::immediate(1)
    }
}

impl RetryConfig {
    /// Retry straight away, `max_retries` times
    pub fn immediate(max_retries: usize) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }

    /// Total attempts including the first
    pub fn attempts(&self) -> usize {
        self.max_retries + 1
    }
}

/// Execute `f` until it succeeds or the retries are used up.
///
/// Only external failures are retried. The last error is returned unchanged.
pub async fn retry_with_backoff<F, Fut, T>(config: &RetryConfig, mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    let mut delay = config.initial_delay;

    loop {
        match f().await {
            Ok(result) => return Ok(result),
            Err(e) => {
                attempt += 1;

                if attempt > config.max_retries || !e.is_external() {
                    return Err(e);
                }

                warn!(attempt, error = %e, "Attempt failed, retrying in {:?}", delay);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                delay = Duration::from_millis(
                    ((delay.as_millis() as f64) * config.multiplier)
                        .min(config.max_delay.as_millis() as f64) as u64,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SakhiError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_retry_succeeds_on_second_attempt() {
        let calls = AtomicUsize::new(0);
        let result = retry_with_backoff(&RetryConfig::immediate(1), || async {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            if n == 0 {
                Err(SakhiError::model("first attempt fails"))
            } else {
                Ok("reply")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "reply");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_one_retry() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = retry_with_backoff(&RetryConfig::immediate(1), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SakhiError::model("down"))
        })
        .await;

        assert!(matches!(result, Err(SakhiError::Model(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_local_errors_are_not_retried() {
        let calls = AtomicUsize::new(0);
        let result: Result<()> = retry_with_backoff(&RetryConfig::immediate(3), || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(SakhiError::template("missing partial"))
        })
        .await;

        assert!(matches!(result, Err(SakhiError::Template(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_default_is_single_immediate_retry() {
        let config = RetryConfig::default();
        assert_eq!(config.attempts(), 2);
        assert!(config.initial_delay.is_zero());
    }
}
