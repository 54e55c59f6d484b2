//! Headless Chromium session via `chromiumoxide`.

use std::time::Duration;

use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;

use super::BrowserSession;
use crate::error::ScraperError;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

fn browser_err(e: impl std::fmt::Display) -> ScraperError {
    ScraperError::Browser(e.to_string())
}

pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromiumSession {
    /// Launches headless Chromium with the given user agent and optional
    /// proxy server.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Browser`] if the browser cannot be launched or
    /// the initial tab cannot be opened.
    pub async fn launch(user_agent: &str, proxy: Option<&str>) -> Result<Self, ScraperError> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg(format!("--user-agent={user_agent}"));
        if let Some(proxy) = proxy {
            builder = builder.arg(format!("--proxy-server={proxy}"));
        }
        let config = builder.build().map_err(ScraperError::Browser)?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_err)?;
        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(browser_err)?;
        page.execute(SetUserAgentOverrideParams::new(user_agent.to_string()))
            .await
            .map_err(browser_err)?;

        tracing::info!("chromium session launched");
        Ok(Self {
            browser,
            page,
            handler,
        })
    }
}

impl BrowserSession for ChromiumSession {
    async fn navigate(&mut self, url: &str) -> Result<(), ScraperError> {
        self.page.goto(url).await.map_err(browser_err)?;
        Ok(())
    }

    async fn wait_for_selector(&mut self, selector: &str) -> Result<(), ScraperError> {
        while self.page.find_element(selector).await.is_err() {
            tokio::time::sleep(POLL_INTERVAL).await;
        }
        Ok(())
    }

    async fn current_document(&mut self) -> Result<String, ScraperError> {
        self.page.content().await.map_err(browser_err)
    }

    async fn close(&mut self) -> Result<(), ScraperError> {
        let result = self.browser.close().await.map(|_| ()).map_err(browser_err);
        self.handler.abort();
        result
    }
}
