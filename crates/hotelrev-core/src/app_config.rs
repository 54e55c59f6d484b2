#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_max_attempts: u32,
    pub scraper_backoff_min_secs: u64,
    pub scraper_backoff_max_secs: u64,
    pub scraper_pacing_min_ms: u64,
    pub scraper_pacing_max_ms: u64,
    pub scraper_browser_wait_secs: u64,
    pub scraper_page_size: u32,
    pub scraper_max_pages_cap: usize,
    pub site_origin: String,
    pub use_proxies: bool,
    pub proxies: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("db_max_connections", &self.db_max_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_max_attempts", &self.scraper_max_attempts)
            .field("scraper_backoff_min_secs", &self.scraper_backoff_min_secs)
            .field("scraper_backoff_max_secs", &self.scraper_backoff_max_secs)
            .field("scraper_pacing_min_ms", &self.scraper_pacing_min_ms)
            .field("scraper_pacing_max_ms", &self.scraper_pacing_max_ms)
            .field("scraper_browser_wait_secs", &self.scraper_browser_wait_secs)
            .field("scraper_page_size", &self.scraper_page_size)
            .field("scraper_max_pages_cap", &self.scraper_max_pages_cap)
            .field("site_origin", &self.site_origin)
            .field("use_proxies", &self.use_proxies)
            // Proxy URLs routinely embed credentials.
            .field("proxies", &format!("[{} redacted]", self.proxies.len()))
            .finish()
    }
}
