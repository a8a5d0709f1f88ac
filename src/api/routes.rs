//! API Routes
//!
//! Configures the Axum router and places the cache gate in front of the
//! cacheable routes.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{get_widget_handler, health_handler, list_widgets_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Store health check (not cached)
/// - `GET /widgets` - Widget list, optional `?color=` filter (cached)
/// - `GET /widgets/:id` - Single widget (cached)
///
/// # Middleware
/// - Cache gate: only on the widget routes
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cached = state.cache.clone().wrap(
        Router::new()
            .route("/widgets", get(list_widgets_handler))
            .route("/widgets/:id", get(get_widget_handler)),
    );

    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
        .merge(cached)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
