//! Upstream Module
//!
//! Everything between a cache miss and the upstream API: the transport seam,
//! per-lookup cancellation and the retrying fetcher.

mod context;
mod fetcher;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use context::FetchContext;
pub use fetcher::{AttemptOutcome, FetchState, Fetcher, DEFAULT_TARGET};
pub use transport::{HttpTransport, RawResponse, Transport, TransportError, TransportErrorKind};
