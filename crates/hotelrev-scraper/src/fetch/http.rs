use std::time::Duration;

use reqwest::header::{
    HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, UPGRADE_INSECURE_REQUESTS, USER_AGENT,
};
use reqwest::{Client, Proxy, Url};

use super::Transport;
use crate::error::ScraperError;
use crate::identity::{random_index, random_user_agent};

/// Proxy schemes reqwest can actually route through with the `socks` feature.
const PROXY_SCHEMES: &[&str] = &["http", "https", "socks5", "socks5h"];

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Plain HTTP GET transport with browser-like headers.
///
/// Holds one direct client plus one client per configured proxy; every
/// request picks a proxy client at random when any are configured.
pub struct HttpTransport {
    direct: Client,
    proxied: Vec<Client>,
}

impl HttpTransport {
    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidProxy`] for a proxy that is not a URL
    /// or uses a scheme other than http, https, socks5 or socks5h, or
    /// [`ScraperError::Http`] if a client cannot be constructed.
    pub fn new(timeout: Duration, proxies: &[String]) -> Result<Self, ScraperError> {
        let direct = Self::client_builder(timeout).build()?;

        let mut proxied = Vec::with_capacity(proxies.len());
        for proxy in proxies {
            let url = parse_proxy(proxy)?;
            let proxy_cfg = Proxy::all(url).map_err(|e| ScraperError::InvalidProxy {
                proxy: redact_proxy(proxy),
                reason: e.to_string(),
            })?;
            proxied.push(Self::client_builder(timeout).proxy(proxy_cfg).build()?);
        }

        Ok(Self { direct, proxied })
    }

    fn client_builder(timeout: Duration) -> reqwest::ClientBuilder {
        Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
    }

    fn pick_client(&self) -> &Client {
        random_index(self.proxied.len())
            .and_then(|i| self.proxied.get(i))
            .unwrap_or(&self.direct)
    }

    /// Number of proxy clients in rotation.
    #[must_use]
    pub fn proxy_count(&self) -> usize {
        self.proxied.len()
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .pick_client()
            .get(url)
            .header(USER_AGENT, random_user_agent())
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .header(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"))
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header(CACHE_CONTROL, "max-age=0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_owned(),
            });
        }

        Ok(response.text().await?)
    }
}

/// Parses a proxy entry and checks its scheme is one requests can be routed
/// through. Anything else would silently fall back to a direct connection.
fn parse_proxy(proxy: &str) -> Result<Url, ScraperError> {
    let invalid = |reason: String| ScraperError::InvalidProxy {
        proxy: redact_proxy(proxy),
        reason,
    };

    let url = Url::parse(proxy.trim()).map_err(|e| invalid(e.to_string()))?;
    if !PROXY_SCHEMES.contains(&url.scheme()) {
        return Err(invalid(format!(
            "unsupported proxy scheme \"{}\"",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing proxy host".to_string()));
    }
    Ok(url)
}

/// Strips credentials from a proxy URL before it reaches an error message.
fn redact_proxy(proxy: &str) -> String {
    match Url::parse(proxy.trim()) {
        Ok(mut url) => {
            if url.username().is_empty() && url.password().is_none() {
                return url.to_string();
            }
            // Both setters only fail for URLs that cannot carry credentials.
            let _ = url.set_username("***");
            let _ = url.set_password(None);
            url.to_string()
        }
        Err(_) if proxy.contains('@') => "[unparseable proxy with credentials]".to_string(),
        Err(_) => proxy.to_owned(),
    }
}
