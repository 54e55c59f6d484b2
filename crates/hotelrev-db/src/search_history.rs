//! Append-only audit log of scrape requests.

use std::fmt;

use chrono::NaiveDateTime;
use sqlx::SqlitePool;

use crate::DbError;

/// What kind of URL was scraped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Hotel,
    Region,
}

impl SearchKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hotel => "hotel",
            Self::Region => "region",
        }
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row from the `search_history` table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SearchHistoryRow {
    pub id: i64,
    pub url: String,
    pub search_kind: String,
    pub searched_at: NaiveDateTime,
}

/// Appends a search entry and returns its id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn record_search(pool: &SqlitePool, url: &str, kind: SearchKind) -> Result<i64, DbError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO search_history (url, search_kind) VALUES (?, ?) RETURNING id",
    )
    .bind(url)
    .bind(kind.as_str())
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Most recent searches first, at most `limit` rows.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_search_history(
    pool: &SqlitePool,
    limit: u32,
) -> Result<Vec<SearchHistoryRow>, DbError> {
    let rows = sqlx::query_as::<_, SearchHistoryRow>(
        "SELECT id, url, search_kind, searched_at \
         FROM search_history \
         ORDER BY searched_at DESC, id DESC \
         LIMIT ?",
    )
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Deletes every history entry. Returns the number removed.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the delete fails.
pub async fn clear_search_history(pool: &SqlitePool) -> Result<u64, DbError> {
    let result = sqlx::query("DELETE FROM search_history")
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
