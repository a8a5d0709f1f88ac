//! Response DTOs for the demo API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// A catalogue item served by the cached `/widgets` routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Widget {
    pub id: u32,
    pub name: String,
    pub color: String,
}

impl Widget {
    /// Creates a new Widget
    pub fn new(id: u32, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status ("healthy" or "degraded")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a HealthResponse reporting a reachable store
    pub fn healthy() -> Self {
        Self::with_status("healthy")
    }

    /// Creates a HealthResponse reporting an unreachable store
    pub fn degraded() -> Self {
        Self::with_status("degraded")
    }

    fn with_status(status: &str) -> Self {
        Self {
            status: status.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
