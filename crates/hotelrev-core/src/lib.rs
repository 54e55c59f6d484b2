mod app_config;
mod config;
mod reviews;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use reviews::{
    HotelRecord, RawReview, ReviewRecord, Sentiment, SummaryStatistics, ANONYMOUS_REVIEWER,
    NOT_AVAILABLE, NO_CONTENT, NO_TITLE,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
