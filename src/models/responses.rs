//! Response DTOs for the gateway API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for the greeting endpoint (GET /hello)
#[derive(Debug, Clone, Serialize)]
pub struct HelloResponse {
    pub message: String,
}

impl HelloResponse {
    /// Creates a greeting for `name`
    pub fn new(name: &str) -> Self {
        Self {
            message: format!("hello {}", name),
        }
    }
}

/// Error envelope shared by every failing endpoint.
///
/// Serializes as `{"error": {"code", "message", "request_id"}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Machine-readable error details
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    /// Stable error code, e.g. "not_found"
    pub code: &'static str,
    /// Human readable description
    pub message: String,
    /// Correlation ID of the failing request
    pub request_id: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(
        code: &'static str,
        message: impl Into<String>,
        request_id: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code,
                message: message.into(),
                request_id: request_id.into(),
            },
        }
    }
}
