//! Cache Module
//!
//! Provides a persistent response cache: key derivation, the durable store,
//! and the request-side cache gate.

mod entry;
mod gate;
mod key;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use gate::{response_cache_layer, ResponseCache};
pub use key::{derive_key, key_for_uri, parse_query, validate_key};
pub use store::{ResponseStore, SqlResponseStore};

// == Public Constants ==
/// Maximum allowed key length in characters (bounded key column)
pub const MAX_KEY_LENGTH: usize = 450;

/// Default TTL for cached responses in seconds (two hours)
pub const DEFAULT_TTL_SECS: u64 = 2 * 60 * 60;

/// Default interval between expiry sweeps in seconds (one hour)
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;
