//! API Module
//!
//! HTTP handlers, middleware and routing for the gateway.
//!
//! # Endpoints
//! - `GET /health` - Health check endpoint
//! - `GET /hello` - Greeting endpoint
//! - `GET /pokemon/:name` - Cached upstream lookup
//! - `GET /metrics` - Prometheus metrics

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
