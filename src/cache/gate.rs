//! Cache Gate Module
//!
//! Axum middleware that serves cached bodies for GET requests and stores the
//! bodies of successful responses on a miss.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};
use tracing::{debug, instrument, warn};

use crate::cache::{key_for_uri, ResponseStore};
use crate::error::CacheError;

// == Response Cache ==
/// Shared state for the cache gate: a store handle and the ttl for new entries.
#[derive(Clone)]
pub struct ResponseCache {
    pub store: Arc<dyn ResponseStore>,
    pub ttl: Duration,
}

impl ResponseCache {
    /// Creates a gate state over `store`, caching new bodies for `ttl`.
    pub fn new(store: Arc<dyn ResponseStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Wraps every route of `router` with the cache gate.
    pub fn wrap(self, router: Router) -> Router {
        router.layer(middleware::from_fn_with_state(self, response_cache_layer))
    }
}

// == Middleware ==
/// Cache gate middleware.
///
/// On a hit the stored body is returned as `application/json` without running
/// the downstream handler. On a miss the handler runs, a `200 OK` body is
/// buffered and written to the store, and only then released to the caller.
/// Store failures never fail the request: a failed lookup counts as a miss
/// and a failed write is logged and dropped.
#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(cache): State<ResponseCache>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = match key_for_uri(request.uri()) {
        Ok(key) => key,
        Err(e) => {
            debug!(outcome = "bypass", error = %e, "request not cacheable");
            return next.run(request).await;
        }
    };

    match cache.store.lookup(&key).await {
        Ok(Some(body)) => {
            debug!(outcome = "hit", key = %key, "serving cached response");
            return json_response(body);
        }
        Ok(None) => debug!(outcome = "miss", key = %key, "cache miss, executing handler"),
        Err(e) => warn!(
            outcome = "store_error",
            key = %key,
            error = %e,
            "cache lookup failed, treating as miss"
        ),
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(key = %key, error = %e, "failed to buffer downstream body");
            return CacheError::Downstream(e.to_string()).into_response();
        }
    };

    match std::str::from_utf8(&bytes) {
        Ok(text) => {
            if let Err(e) = cache.store.put(&key, text, cache.ttl).await {
                warn!(key = %key, error = %e, "cache write failed, response delivered uncached");
            } else {
                debug!(key = %key, bytes = bytes.len(), "response cached");
            }
        }
        Err(_) => debug!(key = %key, "body is not UTF-8, skipping cache write"),
    }

    Response::from_parts(parts, Body::from(bytes))
}

/// Builds the replayed response for a cache hit.
fn json_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        body,
    )
        .into_response()
}
