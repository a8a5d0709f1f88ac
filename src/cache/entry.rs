//! Cache Entry Module
//!
//! Defines the persisted record for a cached response body.

use std::time::Duration;

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// A single cached response body as stored in the `response_cache` table.
///
/// Entries are never mutated after insert; duplicates per key may coexist.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CacheEntry {
    /// Row identifier (auto-increment)
    pub id: i64,
    /// Derived request key
    #[sqlx(rename = "cache_key")]
    pub key: String,
    /// Full response payload
    pub body: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: i64,
}

impl CacheEntry {
    // == Is Live ==
    /// Checks whether the entry may still be served at `now`.
    ///
    /// Boundary condition: an entry whose expiration equals `now` is no
    /// longer live, matching the purge predicate `expires_at <= now`.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now.timestamp_millis()
    }
}

// == Utility Functions ==
/// Converts a TTL into whole milliseconds, saturating at `i64::MAX`.
pub fn ttl_millis(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX)
}

/// Computes the expiration timestamp for an entry created at `created_at_ms`.
pub fn expires_at_ms(created_at_ms: i64, ttl: Duration) -> i64 {
    created_at_ms.saturating_add(ttl_millis(ttl))
}
