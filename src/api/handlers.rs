//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use tower_http::request_id::RequestId;
use tracing::{debug, error};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{ApiError, GatewayError, StartupError};
use crate::metrics::Metrics;
use crate::models::{HelloQuery, HelloResponse, Pokemon};
use crate::upstream::{FetchContext, Fetcher, HttpTransport};

/// Application state shared across all handlers.
///
/// The cache and metrics registry are the only state shared between requests.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<CacheStore<Pokemon>>,
    pub fetcher: Arc<Fetcher>,
    pub metrics: Arc<Metrics>,
    /// Deadline for one lookup including retries, `None` for no deadline
    pub lookup_timeout: Option<Duration>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(
        cache: CacheStore<Pokemon>,
        fetcher: Fetcher,
        metrics: Arc<Metrics>,
        lookup_timeout: Option<Duration>,
    ) -> Self {
        Self {
            cache: Arc::new(cache),
            fetcher: Arc::new(fetcher),
            metrics,
            lookup_timeout,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Wires an HTTP transport to the configured upstream and a fresh metrics registry.
    pub fn from_config(config: &Config) -> Result<Self, StartupError> {
        let metrics = Arc::new(Metrics::new()?);
        let transport = HttpTransport::new(&config.upstream_base_url, config.http_timeout())?;
        let fetcher = Fetcher::new(Arc::new(transport), metrics.clone(), config.retry_policy());
        let cache = CacheStore::new(config.cache_ttl());

        Ok(Self::new(cache, fetcher, metrics, config.lookup_timeout()))
    }
}

/// Correlation ID assigned by the request-id layer, or "unknown" outside it.
pub fn request_id_of(request_id: Option<&RequestId>) -> String {
    request_id
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

/// Handler for GET /pokemon/:name
///
/// Serves live cache hits directly; misses go through the retrying fetcher
/// and successful results are cached.
pub async fn pokemon_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request_id: Option<Extension<RequestId>>,
) -> Result<Json<Pokemon>, ApiError> {
    let rid = || request_id_of(request_id.as_ref().map(|Extension(id)| id));

    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::new(
            GatewayError::BadRequest("name is required".to_string()),
            rid(),
        ));
    }

    if let Some(pokemon) = state.cache.get(name) {
        debug!("Cache hit for {:?}", name);
        return Ok(Json(pokemon));
    }

    let ctx = match state.lookup_timeout {
        Some(timeout) => FetchContext::with_timeout(timeout),
        None => FetchContext::new(),
    };
    let pokemon = state
        .fetcher
        .fetch(&ctx, name)
        .await
        .map_err(|err| ApiError::new(err, rid()))?;

    state.cache.set(name, pokemon.clone());
    Ok(Json(pokemon))
}

/// Handler for GET /hello
pub async fn hello_handler(Query(query): Query<HelloQuery>) -> Json<HelloResponse> {
    Json(HelloResponse::new(query.name_or_default()))
}

/// Handler for GET /health
pub async fn health_handler() -> &'static str {
    "ok"
}

/// Handler for GET /metrics
///
/// Renders the registry in the Prometheus text exposition format.
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(err) => {
            error!("Failed to encode metrics: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
