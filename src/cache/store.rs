//! Cache Store Module
//!
//! Persistence boundary for cached response bodies: lookup, insert and
//! expired-entry purge against the `response_cache` table.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::cache::entry::expires_at_ms;
use crate::cache::key::validate_key;
use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};

/// Upper bound on waiting for a pooled connection before reporting the store unavailable.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

// == Response Store Trait ==
/// Storage contract used by the cache gate and the expiry sweeper.
///
/// Every operation is atomic from the caller's point of view and fails with
/// [`CacheError::StoreUnavailable`] when the backend cannot complete it.
/// The `_at` variants take the clock value explicitly; the plain variants use
/// the wall clock.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Returns the body of a live entry for `key`, if any.
    ///
    /// When several live entries share the key, the most recently created one
    /// wins (ties broken by insertion order). Never mutates the store.
    async fn lookup_at(&self, key: &str, now: DateTime<Utc>) -> Result<Option<String>>;

    /// Inserts a new entry with `created_at = now` and `expires_at = now + ttl`.
    ///
    /// Always inserts, existing rows for the same key are left in place.
    async fn put_at(&self, key: &str, body: &str, ttl: Duration, now: DateTime<Utc>)
        -> Result<()>;

    /// Deletes every entry with `expires_at <= now` and returns how many were removed.
    async fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<u64>;

    async fn lookup(&self, key: &str) -> Result<Option<String>> {
        self.lookup_at(key, Utc::now()).await
    }

    async fn put(&self, key: &str, body: &str, ttl: Duration) -> Result<()> {
        self.put_at(key, body, ttl, Utc::now()).await
    }

    async fn purge_expired(&self) -> Result<u64> {
        self.purge_expired_at(Utc::now()).await
    }
}

// == SQL Response Store ==
/// `ResponseStore` backed by a sqlx SQLite connection pool.
///
/// Concurrency control is left entirely to the database; the store holds no
/// in-process locks.
#[derive(Debug, Clone)]
pub struct SqlResponseStore {
    pool: SqlitePool,
}

impl SqlResponseStore {
    // == Constructors ==
    /// Wraps an existing pool. The schema is expected to be migrated already.
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connects to `url`, applies migrations and returns the ready store.
    ///
    /// # Arguments
    /// * `url` - SQLite connection string, e.g. `sqlite://cache.db?mode=rwc`
    /// * `max_connections` - Pool size
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await?;

        let store = Self::from_pool(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    /// Opens a private in-memory database, mostly useful for tests.
    ///
    /// An in-memory SQLite database lives as long as its connection, so the
    /// pool is pinned to a single connection that is never recycled.
    pub async fn connect_in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect("sqlite::memory:")
            .await?;

        let store = Self::from_pool(pool);
        store.run_migrations().await?;
        Ok(store)
    }

    /// Applies the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    // == Health Check ==
    /// Verifies the backend answers a trivial query.
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    // == Count Entries ==
    /// Counts stored rows, live or not, optionally restricted to one key.
    pub async fn count_entries(&self, key: Option<&str>) -> Result<u64> {
        let count: i64 = match key {
            Some(key) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM response_cache WHERE cache_key = ?")
                    .bind(key)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM response_cache")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(u64::try_from(count).unwrap_or(0))
    }

    // == Entries ==
    /// Returns every stored row for `key`, oldest first.
    pub async fn entries(&self, key: &str) -> Result<Vec<CacheEntry>> {
        let rows = sqlx::query_as::<_, CacheEntry>(
            "SELECT id, cache_key, body, created_at, expires_at \
             FROM response_cache WHERE cache_key = ? ORDER BY created_at, id",
        )
        .bind(key)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ResponseStore for SqlResponseStore {
    async fn lookup_at(&self, key: &str, now: DateTime<Utc>) -> Result<Option<String>> {
        let body = sqlx::query_scalar(
            "SELECT body FROM response_cache \
             WHERE cache_key = ? AND expires_at > ? \
             ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(key)
        .bind(now.timestamp_millis())
        .fetch_optional(&self.pool)
        .await?;
        Ok(body)
    }

    async fn put_at(
        &self,
        key: &str,
        body: &str,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<()> {
        validate_put(key, ttl)?;

        let created_at = now.timestamp_millis();
        sqlx::query(
            "INSERT INTO response_cache (cache_key, body, created_at, expires_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(key)
        .bind(body)
        .bind(created_at)
        .bind(expires_at_ms(created_at, ttl))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn purge_expired_at(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM response_cache WHERE expires_at <= ?")
            .bind(now.timestamp_millis())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Rejects inserts that would break the key column bound or `expires_at > created_at`.
fn validate_put(key: &str, ttl: Duration) -> Result<()> {
    validate_key(key).map_err(|e| CacheError::InvalidRequest(e.to_string()))?;
    if ttl.as_millis() == 0 {
        return Err(CacheError::InvalidRequest(
            "TTL must be at least one millisecond".to_string(),
        ));
    }
    Ok(())
}
