//! Page fetching: one retry/pacing policy over interchangeable transports.
//!
//! A [`Transport`] performs a single attempt (HTTP GET or browser
//! navigation). [`PageFetcher`] wraps any transport with randomized pacing
//! and exponential backoff and exposes the result as a [`PageSource`], which
//! is all the scrape pipeline depends on.

mod browser;
#[cfg(feature = "browser")]
mod chromium;
mod http;

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;
use crate::retry::{retry_with_backoff, RetryPolicy, Sleeper, TokioSleeper};

pub use browser::{BrowserSession, BrowserTransport};
#[cfg(feature = "browser")]
pub use chromium::ChromiumSession;
pub use http::HttpTransport;

/// Something that returns the HTML for a URL.
pub trait PageSource: Send + Sync {
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;
}

/// A single fetch attempt with no retry logic of its own.
pub trait Transport: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;

    /// Releases any held resources. The default does nothing.
    fn close(&self) -> impl Future<Output = ()> + Send {
        async {}
    }
}

/// Random wait inserted before every fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub min: Duration,
    pub max: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(2),
            max: Duration::from_secs(5),
        }
    }
}

impl Pacing {
    #[must_use]
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    /// No pacing at all.
    #[must_use]
    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    /// Uniformly random duration in `[min, max)`; `min` when the range is empty.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let min_ms = u64::try_from(self.min.as_millis()).unwrap_or(u64::MAX);
        let max_ms = u64::try_from(self.max.as_millis()).unwrap_or(u64::MAX);
        if max_ms <= min_ms {
            return self.min;
        }
        Duration::from_millis(rand::random_range(min_ms..max_ms))
    }
}

/// Retrying, paced [`PageSource`] over a [`Transport`].
pub struct PageFetcher<T, S = TokioSleeper> {
    transport: T,
    retry: RetryPolicy,
    pacing: Pacing,
    sleeper: S,
}

impl<T: Transport> PageFetcher<T> {
    pub fn new(transport: T, retry: RetryPolicy, pacing: Pacing) -> Self {
        Self::with_sleeper(transport, retry, pacing, TokioSleeper)
    }
}

impl<T: Transport, S: Sleeper> PageFetcher<T, S> {
    pub fn with_sleeper(transport: T, retry: RetryPolicy, pacing: Pacing, sleeper: S) -> Self {
        Self {
            transport,
            retry,
            pacing,
            sleeper,
        }
    }

    /// Releases the underlying transport (closes the browser, if any).
    pub async fn close(&self) {
        self.transport.close().await;
    }
}

impl<T: Transport, S: Sleeper> PageSource for PageFetcher<T, S> {
    async fn fetch_page(&self, url: &str) -> Result<String, ScraperError> {
        tracing::info!(url, "fetching page");
        retry_with_backoff(&self.retry, &self.sleeper, |attempt| async move {
            let delay = self.pacing.next_delay();
            if !delay.is_zero() {
                self.sleeper.sleep(delay).await;
            }
            tracing::debug!(url, attempt, "fetch attempt");
            self.transport.get(url).await
        })
        .await
    }
}

/// Transport chosen at runtime from configuration.
pub enum AnyTransport {
    Http(HttpTransport),
    #[cfg(feature = "browser")]
    Browser(BrowserTransport<ChromiumSession>),
}

impl Transport for AnyTransport {
    async fn get(&self, url: &str) -> Result<String, ScraperError> {
        match self {
            Self::Http(t) => t.get(url).await,
            #[cfg(feature = "browser")]
            Self::Browser(t) => t.get(url).await,
        }
    }

    async fn close(&self) {
        match self {
            Self::Http(t) => t.close().await,
            #[cfg(feature = "browser")]
            Self::Browser(t) => t.close().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::retry::tests::RecordingSleeper;

    struct FlakyTransport {
        failures_before_success: u32,
        calls: AtomicU32,
    }

    impl Transport for FlakyTransport {
        async fn get(&self, url: &str) -> Result<String, ScraperError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures_before_success {
                Err(ScraperError::UnexpectedStatus {
                    status: 502,
                    url: url.to_owned(),
                })
            } else {
                Ok(format!("<html>{url}</html>"))
            }
        }
    }

    #[test]
    fn pacing_delay_stays_in_range() {
        let pacing = Pacing::new(Duration::from_millis(2000), Duration::from_millis(5000));
        for _ in 0..100 {
            let d = pacing.next_delay();
            assert!(d >= Duration::from_millis(2000));
            assert!(d < Duration::from_millis(5000));
        }
    }

    #[test]
    fn pacing_none_is_zero() {
        assert_eq!(Pacing::none().next_delay(), Duration::ZERO);
    }

    #[test]
    fn pacing_degenerate_range_returns_min() {
        let pacing = Pacing::new(Duration::from_secs(3), Duration::from_secs(3));
        assert_eq!(pacing.next_delay(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn fetcher_paces_every_attempt_and_backs_off_between_failures() {
        let transport = FlakyTransport {
            failures_before_success: 2,
            calls: AtomicU32::new(0),
        };
        let pacing = Pacing::new(Duration::from_secs(1), Duration::from_secs(1));
        let fetcher = PageFetcher::with_sleeper(
            transport,
            RetryPolicy::default(),
            pacing,
            RecordingSleeper::default(),
        );

        let html = fetcher.fetch_page("https://example.test/a").await.unwrap();
        assert_eq!(html, "<html>https://example.test/a</html>");

        let slept: Vec<u64> = fetcher
            .sleeper
            .slept
            .lock()
            .unwrap()
            .iter()
            .map(Duration::as_secs)
            .collect();
        // pace, backoff(4), pace, backoff(4), pace
        assert_eq!(slept, vec![1, 4, 1, 4, 1]);
    }

    #[tokio::test]
    async fn fetcher_without_pacing_only_sleeps_for_backoff() {
        let transport = FlakyTransport {
            failures_before_success: 4,
            calls: AtomicU32::new(0),
        };
        let fetcher = PageFetcher::with_sleeper(
            transport,
            RetryPolicy::default(),
            Pacing::none(),
            RecordingSleeper::default(),
        );

        fetcher.fetch_page("https://example.test/b").await.unwrap();
        assert_eq!(fetcher.transport.calls.load(Ordering::SeqCst), 5);
        assert_eq!(fetcher.sleeper.slept.lock().unwrap().len(), 4);
    }
}
