//! Error types for the gateway
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::upstream::TransportError;

// == Fetch Error Enum ==
/// Classified outcome of a failed upstream lookup.
///
/// Only the final classification leaves the fetcher; retryable failures
/// seen along the way are folded into `UpstreamUnavailable`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Upstream reported the resource does not exist (404)
    #[error("pokemon not found")]
    NotFound,

    /// Upstream answered with a status that is neither success, 404 nor 5xx
    #[error("upstream returned status {0}")]
    UpstreamStatus(u16),

    /// Every attempt failed at the transport level or with a 5xx
    #[error("upstream unavailable: {last_reason}")]
    UpstreamUnavailable {
        last_reason: String,
        last_status: Option<u16>,
    },

    /// The caller's deadline or cancellation fired mid-flight
    #[error("request cancelled before the upstream answered")]
    Cancelled,

    /// A 200 body that does not match the expected document
    #[error("failed to parse upstream response: {0}")]
    DecodeFailure(String),
}

impl FetchError {
    /// HTTP status reported by the upstream, when one was seen.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            FetchError::NotFound => Some(404),
            FetchError::UpstreamStatus(code) => Some(*code),
            FetchError::UpstreamUnavailable { last_status, .. } => *last_status,
            FetchError::DecodeFailure(_) => Some(200),
            FetchError::Cancelled => None,
        }
    }
}

// == Gateway Error Enum ==
/// Everything a gateway endpoint can fail with.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Invalid request data
    #[error("{0}")]
    BadRequest(String),

    /// Upstream lookup failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl GatewayError {
    /// Status code and stable error code for the response.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            GatewayError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            GatewayError::Fetch(err) => match err {
                FetchError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
                FetchError::UpstreamStatus(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
                FetchError::UpstreamUnavailable { .. } => {
                    (StatusCode::BAD_GATEWAY, "upstream_unavailable")
                }
                FetchError::DecodeFailure(_) => (StatusCode::BAD_GATEWAY, "upstream_decode_error"),
                FetchError::Cancelled => (StatusCode::GATEWAY_TIMEOUT, "request_cancelled"),
            },
        }
    }
}

// == API Error ==
/// A gateway error bound to the correlation ID of the request that produced it.
#[derive(Debug)]
pub struct ApiError {
    pub error: GatewayError,
    pub request_id: String,
}

impl ApiError {
    pub fn new(error: impl Into<GatewayError>, request_id: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            request_id: request_id.into(),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.error.status_and_code();
        let body = Json(ErrorResponse::new(
            code,
            self.error.to_string(),
            self.request_id,
        ));

        (status, body).into_response()
    }
}

// == Startup Error ==
/// Failures while wiring the application state at startup.
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("failed to build upstream transport: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to register metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

// == Result Type Alias ==
/// Convenience Result type for upstream lookups.
pub type Result<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (GatewayError::BadRequest("x".into()), StatusCode::BAD_REQUEST, "bad_request"),
            (FetchError::NotFound.into(), StatusCode::NOT_FOUND, "not_found"),
            (FetchError::UpstreamStatus(418).into(), StatusCode::BAD_GATEWAY, "upstream_error"),
            (
                FetchError::UpstreamUnavailable {
                    last_reason: "upstream status 503".into(),
                    last_status: Some(503),
                }
                .into(),
                StatusCode::BAD_GATEWAY,
                "upstream_unavailable",
            ),
            (
                FetchError::DecodeFailure("eof".into()).into(),
                StatusCode::BAD_GATEWAY,
                "upstream_decode_error",
            ),
            (FetchError::Cancelled.into(), StatusCode::GATEWAY_TIMEOUT, "request_cancelled"),
        ];

        for (error, status, code) in cases {
            assert_eq!(error.status_and_code(), (status, code), "{:?}", error);
        }
    }

    #[test]
    fn test_upstream_status() {
        assert_eq!(FetchError::NotFound.upstream_status(), Some(404));
        assert_eq!(FetchError::UpstreamStatus(429).upstream_status(), Some(429));
        assert_eq!(FetchError::Cancelled.upstream_status(), None);
        assert_eq!(
            FetchError::UpstreamUnavailable {
                last_reason: "connection refused".into(),
                last_status: None,
            }
            .upstream_status(),
            None
        );
    }

    #[tokio::test]
    async fn test_api_error_envelope() {
        let response = ApiError::new(FetchError::NotFound, "rid-1").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["error"]["code"], "not_found");
        assert_eq!(json["error"]["message"], "pokemon not found");
        assert_eq!(json["error"]["request_id"], "rid-1");
    }
}
