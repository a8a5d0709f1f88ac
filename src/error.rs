//! Error types for the response cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the response cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Durable backend unreachable, timed out, or rejected the operation
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Request data that cannot be turned into a cache key
    #[error("Malformed cache key: {0}")]
    MalformedKey(String),

    /// The wrapped handler failed to produce a complete response
    #[error("Downstream failure: {0}")]
    Downstream(String),

    /// Invalid input to a store operation
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),
}

// == Backend Error Mapping ==
impl From<sqlx::Error> for CacheError {
    fn from(err: sqlx::Error) -> Self {
        CacheError::StoreUnavailable(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for CacheError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        CacheError::StoreUnavailable(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CacheError::StoreUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            CacheError::MalformedKey(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::Downstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            CacheError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            CacheError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the response cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlx_error_maps_to_store_unavailable() {
        let err: CacheError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, CacheError::StoreUnavailable(_)));
    }

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (
                CacheError::StoreUnavailable("db".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (CacheError::MalformedKey("k".into()), StatusCode::BAD_REQUEST),
            (CacheError::Downstream("body".into()), StatusCode::BAD_GATEWAY),
            (CacheError::NotFound("w".into()), StatusCode::NOT_FOUND),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
