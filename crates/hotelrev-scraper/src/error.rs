use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("browser error: {0}")]
    Browser(String),

    #[error("timed out after {waited_secs}s waiting for `{selector}` on {url}")]
    BrowserTimeout {
        url: String,
        selector: String,
        waited_secs: u64,
    },

    #[error("invalid proxy \"{proxy}\": {reason}")]
    InvalidProxy { proxy: String, reason: String },
}
