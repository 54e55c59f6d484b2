//! Database operations for the `reviews` table.

use chrono::{NaiveDate, NaiveDateTime};
use hotelrev_core::{RawReview, ReviewRecord};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use crate::DbError;

/// A row from the `reviews` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct ReviewRow {
    pub id: i64,
    pub hotel_id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub reviewer_name: Option<String>,
    pub date_text: Option<String>,
    pub review_date: Option<NaiveDate>,
    pub rating: Option<f64>,
    pub sentiment: String,
    pub created_at: NaiveDateTime,
}

impl ReviewRow {
    /// Converts back into extractor shape so stored rows can be re-cleaned
    /// and summarized like fresh ones.
    #[must_use]
    pub fn into_raw_review(self) -> RawReview {
        RawReview {
            title: self.title,
            content: self.content,
            reviewer_name: self.reviewer_name,
            date_text: self.date_text,
            rating_text: self.rating.map(|r| r.to_string()),
        }
    }
}

/// Stable identity of a review within a hotel: SHA-256 hex over reviewer,
/// raw date text and content.
#[must_use]
pub fn dedup_key(reviewer_name: &str, date_text: Option<&str>, content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(reviewer_name.as_bytes());
    hasher.update([0x1f]);
    hasher.update(date_text.unwrap_or_default().as_bytes());
    hasher.update([0x1f]);
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Stores reviews for a hotel, skipping any whose identity is already
/// stored for that hotel. Returns the number of rows inserted.
///
/// All inserts run in one transaction.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if a statement fails (for example a missing
/// hotel id violating the foreign key). Nothing is stored in that case.
pub async fn insert_reviews(
    pool: &SqlitePool,
    hotel_id: i64,
    reviews: &[ReviewRecord],
) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;

    for review in reviews {
        let key = dedup_key(
            &review.reviewer_name,
            review.date_text.as_deref(),
            &review.content,
        );
        inserted += sqlx::query(
            "INSERT OR IGNORE INTO reviews \
                 (hotel_id, title, content, reviewer_name, date_text, review_date, \
                  rating, sentiment, dedup_key) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(hotel_id)
        .bind(&review.title)
        .bind(&review.content)
        .bind(&review.reviewer_name)
        .bind(review.date_text.as_deref())
        .bind(review.date)
        .bind(review.rating)
        .bind(review.sentiment.as_str())
        .bind(&key)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    }

    tx.commit().await?;
    Ok(inserted)
}

/// Returns a hotel's reviews in insertion order.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn query_reviews_by_hotel(
    pool: &SqlitePool,
    hotel_id: i64,
) -> Result<Vec<ReviewRow>, DbError> {
    let rows = sqlx::query_as::<_, ReviewRow>(
        "SELECT id, hotel_id, title, content, reviewer_name, date_text, review_date, \
                rating, sentiment, created_at \
         FROM reviews \
         WHERE hotel_id = ? \
         ORDER BY id",
    )
    .bind(hotel_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_key_is_stable_hex() {
        let a = dedup_key("Ana", Some("Jan 2024"), "Great");
        let b = dedup_key("Ana", Some("Jan 2024"), "Great");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn dedup_key_separates_fields() {
        assert_ne!(
            dedup_key("ab", Some("c"), "d"),
            dedup_key("a", Some("bc"), "d")
        );
    }

    #[test]
    fn dedup_key_differs_on_content() {
        assert_ne!(
            dedup_key("Ana", Some("Jan 2024"), "Great"),
            dedup_key("Ana", Some("Jan 2024"), "Awful")
        );
    }

    #[test]
    fn into_raw_review_keeps_nulls() {
        let row = ReviewRow {
            id: 1,
            hotel_id: 1,
            title: None,
            content: Some("c".to_string()),
            reviewer_name: None,
            date_text: Some("Jan 2024".to_string()),
            review_date: None,
            rating: Some(4.5),
            sentiment: "Positive".to_string(),
            created_at: NaiveDateTime::default(),
        };
        let raw = row.into_raw_review();
        assert_eq!(raw.title, None);
        assert_eq!(raw.reviewer_name, None);
        assert_eq!(raw.rating_text.as_deref(), Some("4.5"));
    }
}
