//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::retry::{Backoff, RetryPolicy};

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
/// The backoff shape is fixed and not read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the upstream API, without the `/pokemon` segment
    pub upstream_base_url: String,
    /// Timeout in seconds for a single upstream HTTP call, 0 disables it
    pub http_timeout: u64,
    /// Cache TTL in seconds, 0 disables caching
    pub cache_ttl: u64,
    /// Upstream attempts per lookup, including the first
    pub max_attempts: u32,
    /// Deadline in seconds for a whole lookup including retries, 0 disables it
    pub lookup_timeout: u64,
    /// Background sweep interval in seconds, 0 disables the sweeper
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 8080)
    /// - `POKEAPI_BASE_URL` - Upstream base URL (default: https://pokeapi.co/api/v2)
    /// - `HTTP_TIMEOUT_SEC` - Per-call upstream timeout, 0 for none (default: 5)
    /// - `POKEMON_CACHE_TTL_SEC` - Cache TTL (default: 300)
    /// - `UPSTREAM_MAX_ATTEMPTS` - Attempts per lookup (default: 3)
    /// - `LOOKUP_TIMEOUT_SEC` - Whole-lookup deadline, 0 for none (default: 10)
    /// - `CACHE_CLEANUP_INTERVAL_SEC` - Expired entry sweep frequency (default: 60)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("PORT").unwrap_or(defaults.server_port),
            upstream_base_url: env::var("POKEAPI_BASE_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.upstream_base_url),
            http_timeout: parse_var("HTTP_TIMEOUT_SEC").unwrap_or(defaults.http_timeout),
            cache_ttl: parse_var("POKEMON_CACHE_TTL_SEC").unwrap_or(defaults.cache_ttl),
            max_attempts: parse_var("UPSTREAM_MAX_ATTEMPTS").unwrap_or(defaults.max_attempts),
            lookup_timeout: parse_var("LOOKUP_TIMEOUT_SEC").unwrap_or(defaults.lookup_timeout),
            cleanup_interval: parse_var("CACHE_CLEANUP_INTERVAL_SEC")
                .unwrap_or(defaults.cleanup_interval),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Per-call upstream timeout, `None` when set to 0.
    pub fn http_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.http_timeout)
    }

    /// Whole-lookup deadline, `None` when set to 0.
    pub fn lookup_timeout(&self) -> Option<Duration> {
        non_zero_secs(self.lookup_timeout)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Backoff::default())
    }
}

fn parse_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8080,
            upstream_base_url: "https://pokeapi.co/api/v2".to_string(),
            http_timeout: 5,
            cache_ttl: 300,
            max_attempts: 3,
            lookup_timeout: 10,
            cleanup_interval: 60,
        }
    }
}
