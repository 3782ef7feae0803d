//! Cache Module
//!
//! Provides in-memory caching with a single TTL and lazy expiry.

mod entry;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use store::CacheStore;
