//! Retry Module
//!
//! Pure retry decisions: outcome classification, the retry bound and
//! exponential backoff with jitter. Nothing here sleeps or holds state.

mod backoff;
mod policy;

pub use backoff::{Backoff, DEFAULT_BASE_DELAY, DEFAULT_JITTER_MAX, DEFAULT_MAX_DELAY};
pub use policy::{classify, Classification, Failure, RetryPolicy};
