use std::time::Duration;

use hotelrev_core::AppConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 10;

// Path relative to crates/hotelrev-db/Cargo.toml; resolves to <workspace-root>/migrations/
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations");

#[derive(Debug, Clone, Copy)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout_secs: DEFAULT_ACQUIRE_TIMEOUT_SECS,
        }
    }
}

impl PoolConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.db_max_connections,
            acquire_timeout_secs: config.db_acquire_timeout_secs,
        }
    }
}

#[derive(Debug, Error)]
pub enum DbError {
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Connect to a SQLite pool using an explicit URL and config.
///
/// Foreign keys are enforced on every connection. The database file is
/// created if the URL asks for it (`?mode=rwc`), along with its parent
/// directory.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the URL is malformed, the parent directory
/// cannot be created, or the connection cannot be established.
pub async fn connect_pool(
    database_url: &str,
    config: PoolConfig,
) -> Result<SqlitePool, sqlx::Error> {
    let options = database_url
        .parse::<SqliteConnectOptions>()?
        .foreign_keys(true);

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_with(options)
        .await
}

/// Run all pending migrations against the pool.
///
/// Returns the number of migrations that were applied.
///
/// # Errors
///
/// Returns [`sqlx::migrate::MigrateError`] if any migration fails or the
/// migration ledger cannot be read.
pub async fn run_migrations(pool: &SqlitePool) -> Result<usize, sqlx::migrate::MigrateError> {
    let applied_before = applied_migrations(pool).await?;
    MIGRATOR.run(pool).await?;
    let applied_after = applied_migrations(pool).await?;

    let delta = (applied_after - applied_before).max(0);
    Ok(usize::try_from(delta).unwrap_or(0))
}

/// Successful migrations recorded so far. A database that has never been
/// migrated has no `_sqlx_migrations` table and counts as zero.
async fn applied_migrations(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let tracked = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_sqlx_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if tracked == 0 {
        return Ok(0);
    }

    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1")
        .fetch_one(pool)
        .await
}

/// Send a `SELECT 1` to verify the pool has a live connection.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn ping(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_pool() -> SqlitePool {
        connect_pool(
            "sqlite::memory:",
            PoolConfig {
                max_connections: 1,
                acquire_timeout_secs: 5,
            },
        )
        .await
        .expect("failed to open in-memory sqlite")
    }

    #[tokio::test]
    async fn unmigrated_database_counts_zero_applied() {
        let pool = memory_pool().await;
        assert_eq!(applied_migrations(&pool).await.unwrap(), 0);

        run_migrations(&pool).await.unwrap();
        assert!(applied_migrations(&pool).await.unwrap() >= 1);
    }

    #[tokio::test]
    async fn ledger_read_failure_is_propagated() {
        let pool = memory_pool().await;
        pool.close().await;

        assert!(applied_migrations(&pool).await.is_err());
        assert!(run_migrations(&pool).await.is_err());
    }

    #[test]
    fn pool_config_has_sane_defaults() {
        let config = PoolConfig::default();

        assert_eq!(config.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(config.acquire_timeout_secs, DEFAULT_ACQUIRE_TIMEOUT_SECS);
    }
}

pub mod hotels;
pub mod reviews;
pub mod search_history;

pub use hotels::{
    delete_hotel, get_hotel, get_hotel_by_url, query_hotels, upsert_hotel, HotelRow,
};
pub use reviews::{dedup_key, insert_reviews, query_reviews_by_hotel, ReviewRow};
pub use search_history::{
    clear_search_history, list_search_history, record_search, SearchHistoryRow, SearchKind,
};
