//! Retry policy for page fetches.
//!
//! Transport failures are retried with exponential backoff; client errors
//! (4xx other than 429) are returned immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// Abstraction over "wait this long".
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(duration)
    }
}

/// Attempt budget and backoff bounds for one page fetch.
///
/// The wait before retry `n` (1-based) is `2^n` seconds clamped to
/// `[min_delay, max_delay]`. With the defaults that is 4, 4, 8, 16 seconds
/// across the four retries that follow the first attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one.
    pub max_attempts: u32,
    pub min_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            min_delay: Duration::from_secs(4),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, min_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts,
            min_delay,
            max_delay,
        }
    }

    /// Delay before the `retry`-th retry (1-based).
    #[must_use]
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        let exp_secs = 1u64 << retry.min(62);
        Duration::from_secs(exp_secs).clamp(self.min_delay, self.max_delay.max(self.min_delay))
    }
}

/// Returns `true` if `err` is worth another attempt.
///
/// Retriable: network-level failures, HTTP 429 and 5xx, and browser
/// navigation failures or wait timeouts. Everything else, notably 4xx
/// responses and proxy misconfiguration, is returned immediately.
pub(crate) fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(_) | ScraperError::Browser(_) | ScraperError::BrowserTimeout { .. } => {
            true
        }
        ScraperError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        ScraperError::InvalidProxy { .. } => false,
    }
}

/// Executes `operation` until it succeeds, fails with a non-retriable error,
/// or `policy.max_attempts` attempts have been made. The operation receives
/// the 1-based attempt number.
pub(crate) async fn retry_with_backoff<T, F, Fut, S>(
    policy: &RetryPolicy,
    sleeper: &S,
    mut operation: F,
) -> Result<T, ScraperError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, ScraperError>>,
    S: Sleeper,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;

    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_attempts {
                    return Err(err);
                }
                let delay = policy.delay_before_retry(attempt);
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_secs = delay.as_secs(),
                    error = %err,
                    "transient fetch error, retrying after backoff"
                );
                sleeper.sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    /// Records requested durations and returns immediately.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSleeper {
        pub(crate) slept: Mutex<Vec<Duration>>,
    }

    impl Sleeper for RecordingSleeper {
        fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
            self.slept.lock().unwrap().push(duration);
            std::future::ready(())
        }
    }

    fn server_error() -> ScraperError {
        ScraperError::UnexpectedStatus {
            status: 503,
            url: "https://example.test/".to_owned(),
        }
    }

    #[test]
    fn default_schedule_is_floored_doubling_and_capped() {
        let policy = RetryPolicy::default();
        let delays: Vec<u64> = (1..=7)
            .map(|n| policy.delay_before_retry(n).as_secs())
            .collect();
        assert_eq!(delays, vec![4, 4, 8, 16, 32, 60, 60]);
    }

    #[test]
    fn client_errors_are_not_retriable() {
        for status in [400, 403, 404] {
            assert!(!is_retriable(&ScraperError::UnexpectedStatus {
                status,
                url: String::new(),
            }));
        }
    }

    #[test]
    fn throttling_and_server_errors_are_retriable() {
        for status in [429, 500, 502, 503] {
            assert!(is_retriable(&ScraperError::UnexpectedStatus {
                status,
                url: String::new(),
            }));
        }
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let sleeper = RecordingSleeper::default();
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(&RetryPolicy::default(), &sleeper, |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, ScraperError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(sleeper.slept.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn four_failures_then_success_backs_off_four_times() {
        let sleeper = RecordingSleeper::default();
        let result = retry_with_backoff(&RetryPolicy::default(), &sleeper, |attempt| async move {
            if attempt < 5 {
                Err(server_error())
            } else {
                Ok::<&str, ScraperError>("payload")
            }
        })
        .await;
        assert_eq!(result.unwrap(), "payload");

        let slept: Vec<u64> = sleeper
            .slept
            .lock()
            .unwrap()
            .iter()
            .map(Duration::as_secs)
            .collect();
        assert_eq!(slept, vec![4, 4, 8, 16]);
    }

    #[tokio::test]
    async fn propagates_last_error_after_exhausting_attempts() {
        let sleeper = RecordingSleeper::default();
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let policy = RetryPolicy::new(3, Duration::ZERO, Duration::ZERO);
        let result = retry_with_backoff(&policy, &sleeper, |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(server_error())
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 3);
        assert_eq!(sleeper.slept.lock().unwrap().len(), 2);
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 503, .. })
        ));
    }

    #[tokio::test]
    async fn does_not_retry_not_found() {
        let sleeper = RecordingSleeper::default();
        let call_count = Arc::new(AtomicU32::new(0));
        let cc = Arc::clone(&call_count);
        let result = retry_with_backoff(&RetryPolicy::default(), &sleeper, |_| {
            let cc = Arc::clone(&cc);
            async move {
                cc.fetch_add(1, Ordering::SeqCst);
                Err::<u32, ScraperError>(ScraperError::UnexpectedStatus {
                    status: 404,
                    url: "https://example.test/missing".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(call_count.load(Ordering::SeqCst), 1);
        assert!(sleeper.slept.lock().unwrap().is_empty());
        assert!(matches!(
            result,
            Err(ScraperError::UnexpectedStatus { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn zero_attempt_budget_still_tries_once() {
        let sleeper = RecordingSleeper::default();
        let policy = RetryPolicy::new(0, Duration::ZERO, Duration::ZERO);
        let result = retry_with_backoff(&policy, &sleeper, |_| async {
            Err::<u32, ScraperError>(server_error())
        })
        .await;
        assert!(result.is_err());
        assert!(sleeper.slept.lock().unwrap().is_empty());
    }
}
