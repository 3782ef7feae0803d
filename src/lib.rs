//! Pokegate - A small resilient HTTP gateway
//!
//! Proxies the PokeAPI lookup endpoint behind a TTL cache, bounded retries
//! with exponential backoff, correlation IDs and Prometheus-style metrics.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod retry;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
