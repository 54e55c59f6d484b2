//! Cleaning of raw extractor output into [`ReviewRecord`]s.

use std::collections::HashSet;
use std::sync::LazyLock;

use chrono::NaiveDate;
use hotelrev_core::{
    RawReview, ReviewRecord, Sentiment, ANONYMOUS_REVIEWER, NO_CONTENT, NO_TITLE,
};
use regex::Regex;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("valid number regex"));

/// Day-precision date layouts.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// Month-precision layouts; parsed as the first of the month.
const MONTH_FORMATS: &[&str] = &["%B %Y", "%b %Y", "%Y-%m"];

/// Cleans a raw review set.
///
/// Records whose (reviewer, date text, content) triple repeats an earlier one
/// are dropped, first occurrence kept. Missing or blank title, content and
/// reviewer get their sentinels; date and rating are coerced, with failures
/// left as `None`. Input order is preserved.
#[must_use]
pub fn clean(raw: Vec<RawReview>) -> Vec<ReviewRecord> {
    let mut seen: HashSet<(Option<String>, Option<String>, Option<String>)> = HashSet::new();
    let total = raw.len();
    let mut records = Vec::with_capacity(total);

    for review in raw {
        let key = (
            review.reviewer_name.clone(),
            review.date_text.clone(),
            review.content.clone(),
        );
        if !seen.insert(key) {
            continue;
        }

        let rating = review.rating_text.as_deref().and_then(parse_rating);
        records.push(ReviewRecord {
            title: or_sentinel(review.title, NO_TITLE),
            content: or_sentinel(review.content, NO_CONTENT),
            reviewer_name: or_sentinel(review.reviewer_name, ANONYMOUS_REVIEWER),
            date: review.date_text.as_deref().and_then(parse_review_date),
            date_text: review.date_text,
            rating,
            sentiment: sentiment(rating),
        });
    }

    let dropped = total - records.len();
    if dropped > 0 {
        tracing::debug!(dropped, kept = records.len(), "dropped duplicate reviews");
    }
    records
}

/// Sentiment label for an optional 0–5 rating.
#[must_use]
pub fn sentiment(rating: Option<f64>) -> Sentiment {
    Sentiment::from_rating(rating)
}

/// Reads a 0–5 rating from free text such as `"4.5"`, `"5.0 of 5 bubbles"`
/// or `"4"`. Out-of-range or unreadable values are `None`.
#[must_use]
pub fn parse_rating(text: &str) -> Option<f64> {
    let text = text.trim();
    let value = text.parse::<f64>().ok().or_else(|| {
        FIRST_NUMBER
            .find(text)
            .and_then(|m| m.as_str().parse::<f64>().ok())
    })?;
    (value.is_finite() && (0.0..=5.0).contains(&value)).then_some(value)
}

/// Parses the date shapes seen on review pages. Month-only dates resolve to
/// the first of the month.
#[must_use]
pub fn parse_review_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            let with_day = format!("1 {text}");
            MONTH_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(&with_day, &format!("%d {fmt}")).ok())
        })
}

fn or_sentinel(value: Option<String>, sentinel: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| sentinel.to_string())
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
