//! Response Cache - A persistent HTTP response cache
//!
//! Memoizes response bodies keyed by path and sorted query parameters, with
//! TTL expiry and a background sweeper that purges expired entries.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{ResponseCache, ResponseStore, SqlResponseStore};
pub use config::Config;
pub use tasks::spawn_sweeper;
