//! Hotel and review records shared by the scraper, the store, and the CLI.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Placeholder emitted by the extractor when no locator matched a field.
pub const NOT_AVAILABLE: &str = "N/A";
pub const NO_TITLE: &str = "No Title";
pub const NO_CONTENT: &str = "No Content";
pub const ANONYMOUS_REVIEWER: &str = "Anonymous";

/// Hotel metadata extracted from a single detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelRecord {
    pub name: String,
    pub location: String,
    /// Rating exactly as rendered on the page; coerced to a number on write.
    pub rating_text: String,
    pub total_review_count: u32,
    /// Identity key for upserts.
    pub source_url: String,
}

impl HotelRecord {
    /// A record carrying only sentinels, used when page 1 could not be fetched.
    #[must_use]
    pub fn unknown(source_url: &str) -> Self {
        Self {
            name: NOT_AVAILABLE.to_string(),
            location: NOT_AVAILABLE.to_string(),
            rating_text: NOT_AVAILABLE.to_string(),
            total_review_count: 0,
            source_url: source_url.to_string(),
        }
    }
}

/// Review fields as pulled out of the markup, before any coercion.
///
/// The extractor fills every field with its default on a miss; `None` only
/// shows up for rows read back from storage with `NULL` columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawReview {
    pub title: Option<String>,
    pub content: Option<String>,
    pub reviewer_name: Option<String>,
    pub date_text: Option<String>,
    pub rating_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Unknown,
}

impl Sentiment {
    /// Buckets a 0–5 rating. Bounds are inclusive on the lower edge:
    /// 4.0 is positive, 3.0 is neutral.
    #[must_use]
    pub fn from_rating(rating: Option<f64>) -> Self {
        match rating {
            None => Self::Unknown,
            Some(r) if r >= 4.0 => Self::Positive,
            Some(r) if r >= 3.0 => Self::Neutral,
            Some(_) => Self::Negative,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleaned review. `title`, `content`, and `reviewer_name` are never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub title: String,
    pub content: String,
    pub reviewer_name: String,
    /// Raw date text; part of the dedup identity.
    pub date_text: Option<String>,
    pub date: Option<NaiveDate>,
    /// 0–5 scale, `None` when the rating could not be read.
    pub rating: Option<f64>,
    pub sentiment: Sentiment,
}

/// Aggregates over a review set. Derived, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_count: usize,
    pub average_rating: f64,
    pub sentiment_counts: BTreeMap<Sentiment, usize>,
    /// Keyed by `YYYY-MM`.
    pub reviews_by_month: BTreeMap<String, usize>,
}
