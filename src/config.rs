//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{DEFAULT_SWEEP_INTERVAL_SECS, DEFAULT_TTL_SECS};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Connection descriptor for the durable store
    pub database_url: String,
    /// Maximum number of pooled store connections
    pub max_connections: u32,
    /// HTTP server port
    pub server_port: u16,
    /// TTL in seconds applied to every cached response
    pub response_ttl: u64,
    /// Expiry sweeper interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DATABASE_URL` - Store connection string (default: `sqlite://response_cache.db?mode=rwc`)
    /// - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `RESPONSE_TTL` - Response TTL in seconds (default: 7200)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 3600)
    ///
    /// Zero is not a valid TTL or interval and falls back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: parse_var("DB_MAX_CONNECTIONS")
                .filter(|&n| n > 0)
                .unwrap_or(defaults.max_connections),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            response_ttl: parse_var("RESPONSE_TTL")
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.response_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL")
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.sweep_interval),
        }
    }

    /// Response TTL as a `Duration`.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.response_ttl)
    }

    /// Sweep interval as a `Duration`.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://response_cache.db?mode=rwc".to_string(),
            max_connections: 5,
            server_port: 3000,
            response_ttl: DEFAULT_TTL_SECS,
            sweep_interval: DEFAULT_SWEEP_INTERVAL_SECS,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
