//! API Handlers
//!
//! HTTP request handlers for the demo server. The widget handlers stand in
//! for the business logic whose responses the cache gate memoizes.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::warn;

use crate::cache::{ResponseCache, SqlResponseStore};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{HealthResponse, Widget};

/// Application state shared across all handlers.
///
/// The store handle is acquired once at startup and injected here; the cache
/// gate shares the same handle.
#[derive(Clone)]
pub struct AppState {
    /// Durable store, used directly for health checks
    pub store: Arc<SqlResponseStore>,
    /// Cache gate state wrapping the cached routes
    pub cache: ResponseCache,
}

impl AppState {
    /// Creates a new AppState around an existing store.
    pub fn new(store: Arc<SqlResponseStore>, ttl: std::time::Duration) -> Self {
        let cache = ResponseCache::new(store.clone(), ttl);
        Self { store, cache }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Connects to the configured store and applies migrations.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = SqlResponseStore::connect(&config.database_url, config.max_connections).await?;
        Ok(Self::new(Arc::new(store), config.ttl()))
    }
}

/// Query parameters accepted by GET /widgets
#[derive(Debug, Default, Deserialize)]
pub struct WidgetFilter {
    pub color: Option<String>,
}

fn catalogue() -> Vec<Widget> {
    vec![
        Widget::new(1, "sprocket", "red"),
        Widget::new(2, "gear", "blue"),
        Widget::new(3, "flange", "red"),
        Widget::new(4, "bracket", "green"),
    ]
}

/// Handler for GET /widgets
pub async fn list_widgets_handler(Query(filter): Query<WidgetFilter>) -> Json<Vec<Widget>> {
    let widgets = catalogue()
        .into_iter()
        .filter(|w| filter.color.as_deref().map_or(true, |c| w.color == c))
        .collect();
    Json(widgets)
}

/// Handler for GET /widgets/:id
pub async fn get_widget_handler(Path(id): Path<u32>) -> Result<Json<Widget>> {
    catalogue()
        .into_iter()
        .find(|w| w.id == id)
        .map(Json)
        .ok_or_else(|| CacheError::NotFound(format!("widget {}", id)))
}

/// Handler for GET /health
///
/// Reports whether the durable store answers; never cached.
pub async fn health_handler(
    State(state): State<AppState>,
) -> (StatusCode, Json<HealthResponse>) {
    match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::degraded()),
            )
        }
    }
}
