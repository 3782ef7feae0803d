//! API Middleware
//!
//! Correlation IDs, access logging and per-request metrics.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::info;
use uuid::Uuid;

use super::handlers::AppState;

/// Header carrying the correlation ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Generates 32 lowercase hex characters for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeHexRequestId;

impl MakeRequestId for MakeHexRequestId {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().simple().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Matched route template, falling back to the raw path for unmatched requests.
fn route_of(request: &Request) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}

/// Logs one line per request with its correlation ID.
pub async fn access_log(request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().clone();
    let route = route_of(&request);
    let rid = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(request).await;

    info!(
        "rid={} method={} route={} status={} duration={:?}",
        rid,
        method,
        route,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

/// Records request count and latency per route, method and status.
pub async fn track_metrics(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let route = route_of(&request);

    let response = next.run(request).await;

    state.metrics.record_http(
        &route,
        &method,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_request_id_is_32_hex_chars() {
        let request = axum::http::Request::new(());
        let id = MakeHexRequestId.make_request_id(&request).unwrap();
        let id = id.header_value().to_str().unwrap();

        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_request_ids_differ() {
        let request = axum::http::Request::new(());
        let a = MakeHexRequestId.make_request_id(&request).unwrap();
        let b = MakeHexRequestId.make_request_id(&request).unwrap();
        assert_ne!(a.header_value(), b.header_value());
    }
}
