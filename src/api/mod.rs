//! API Module
//!
//! HTTP handlers and routing for the demo server.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /widgets` - Cached widget list
//! - `GET /widgets/:id` - Cached widget lookup

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
