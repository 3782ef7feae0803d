//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use super::handlers::{hello_handler, health_handler, metrics_handler, pokemon_handler, AppState};
use super::middleware::{access_log, track_metrics, MakeHexRequestId};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Liveness check, plain `ok`
/// - `GET /hello` - Greeting, optional `name` query parameter
/// - `GET /pokemon/:name` - Cached, retrying upstream lookup
/// - `GET /metrics` - Prometheus text exposition
///
/// # Middleware (outermost first)
/// - Request ID: reuses an inbound `X-Request-ID` or generates one, echoed on the response
/// - Tracing: request spans for debugging
/// - Metrics: per-route request count and latency
/// - Access log: one line per request with its correlation ID
pub fn create_router(state: AppState) -> Router {
    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::x_request_id(MakeHexRequestId))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(middleware::from_fn_with_state(state.clone(), track_metrics))
        .layer(middleware::from_fn(access_log));

    Router::new()
        .route("/health", get(health_handler))
        .route("/hello", get(hello_handler))
        .route("/pokemon/:name", get(pokemon_handler))
        .route("/metrics", get(metrics_handler))
        .layer(middleware)
        .with_state(state)
}
