use std::future::Future;
use std::time::Duration;

use tokio::sync::Mutex;

use super::Transport;
use crate::error::ScraperError;

/// Selector that must be present before the document is considered loaded.
const READY_SELECTOR: &str = "body";

/// A driven browser tab. Installing and launching the browser is the
/// implementor's concern.
pub trait BrowserSession: Send {
    fn navigate(&mut self, url: &str) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Resolves once `selector` matches an element. Callers bound the wait.
    fn wait_for_selector(
        &mut self,
        selector: &str,
    ) -> impl Future<Output = Result<(), ScraperError>> + Send;

    /// Rendered HTML of the current page.
    fn current_document(&mut self) -> impl Future<Output = Result<String, ScraperError>> + Send;

    fn close(&mut self) -> impl Future<Output = Result<(), ScraperError>> + Send;
}

/// [`Transport`] that loads pages in a browser session.
pub struct BrowserTransport<B> {
    session: Mutex<B>,
    wait: Duration,
}

impl<B: BrowserSession> BrowserTransport<B> {
    pub fn new(session: B, wait: Duration) -> Self {
        Self {
            session: Mutex::new(session),
            wait,
        }
    }
}

impl<B: BrowserSession> Transport for BrowserTransport<B> {
    async fn get(&self, url: &str) -> Result<String, ScraperError> {
        let mut session = self.session.lock().await;
        session.navigate(url).await?;

        match tokio::time::timeout(self.wait, session.wait_for_selector(READY_SELECTOR)).await {
            Ok(waited) => waited?,
            Err(_) => {
                return Err(ScraperError::BrowserTimeout {
                    url: url.to_owned(),
                    selector: READY_SELECTOR.to_owned(),
                    waited_secs: self.wait.as_secs(),
                });
            }
        }

        session.current_document().await
    }

    async fn close(&self) {
        let mut session = self.session.lock().await;
        match session.close().await {
            Ok(()) => tracing::info!("browser session closed"),
            Err(e) => tracing::warn!(error = %e, "failed to close browser session"),
        }
    }
}
