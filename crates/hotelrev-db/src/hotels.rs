//! Database operations for the `hotels` table.

use chrono::NaiveDateTime;
use hotelrev_core::HotelRecord;
use sqlx::SqlitePool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `hotels` table.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct HotelRow {
    pub id: i64,
    pub name: String,
    pub location: String,
    /// Numeric rating on a 0–5 scale; `NULL` when the page text was unreadable.
    pub rating: Option<f64>,
    pub rating_text: String,
    pub total_reviews: i64,
    pub url: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

const HOTEL_COLUMNS: &str =
    "id, name, location, rating, rating_text, total_reviews, url, created_at, updated_at";

// ---------------------------------------------------------------------------
// Writes
// ---------------------------------------------------------------------------

/// Inserts a hotel or, if its URL is already stored, refreshes the mutable
/// fields and touches `updated_at`. Returns the hotel id either way.
///
/// `rating` is the numeric form of `hotel.rating_text`, coerced by the caller.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the statement fails.
pub async fn upsert_hotel(
    pool: &SqlitePool,
    hotel: &HotelRecord,
    rating: Option<f64>,
) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO hotels (name, location, rating, rating_text, total_reviews, url) \
         VALUES (?, ?, ?, ?, ?, ?) \
         ON CONFLICT (url) DO UPDATE SET \
             name = excluded.name, \
             location = excluded.location, \
             rating = excluded.rating, \
             rating_text = excluded.rating_text, \
             total_reviews = excluded.total_reviews, \
             updated_at = CURRENT_TIMESTAMP \
         RETURNING id",
    )
    .bind(&hotel.name)
    .bind(&hotel.location)
    .bind(rating)
    .bind(&hotel.rating_text)
    .bind(i64::from(hotel.total_review_count))
    .bind(&hotel.source_url)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Deletes a hotel and all of its reviews in one transaction. Returns the
/// number of reviews removed.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no hotel has this id (nothing is
/// deleted), or [`DbError::Sqlx`] if a statement fails.
pub async fn delete_hotel(pool: &SqlitePool, hotel_id: i64) -> Result<u64, DbError> {
    let mut tx = pool.begin().await?;

    let reviews_deleted = sqlx::query("DELETE FROM reviews WHERE hotel_id = ?")
        .bind(hotel_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    let hotels_deleted = sqlx::query("DELETE FROM hotels WHERE id = ?")
        .bind(hotel_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

    if hotels_deleted == 0 {
        tx.rollback().await?;
        return Err(DbError::NotFound);
    }

    tx.commit().await?;
    Ok(reviews_deleted)
}

// ---------------------------------------------------------------------------
// Reads
// ---------------------------------------------------------------------------

/// Returns hotels ordered by name, optionally restricted to those whose
/// location contains `location` (case-insensitive for ASCII).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn query_hotels(
    pool: &SqlitePool,
    location: Option<&str>,
) -> Result<Vec<HotelRow>, DbError> {
    let rows = match location {
        Some(filter) => {
            sqlx::query_as::<_, HotelRow>(&format!(
                "SELECT {HOTEL_COLUMNS} FROM hotels \
                 WHERE location LIKE '%' || ? || '%' \
                 ORDER BY name"
            ))
            .bind(filter)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, HotelRow>(&format!(
                "SELECT {HOTEL_COLUMNS} FROM hotels ORDER BY name"
            ))
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}

/// Returns the hotel stored under `url`, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_hotel_by_url(pool: &SqlitePool, url: &str) -> Result<Option<HotelRow>, DbError> {
    let row = sqlx::query_as::<_, HotelRow>(&format!(
        "SELECT {HOTEL_COLUMNS} FROM hotels WHERE url = ?"
    ))
    .bind(url)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the hotel with `hotel_id`, or `None`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_hotel(pool: &SqlitePool, hotel_id: i64) -> Result<Option<HotelRow>, DbError> {
    let row = sqlx::query_as::<_, HotelRow>(&format!(
        "SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = ?"
    ))
    .bind(hotel_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
