//! Request and Response models for the gateway API
//!
//! This module defines the upstream payload we normalize to and the
//! DTOs used for serializing/deserializing HTTP request and response bodies.

pub mod pokemon;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use pokemon::Pokemon;
pub use requests::HelloQuery;
pub use responses::{ErrorBody, ErrorResponse, HelloResponse};
