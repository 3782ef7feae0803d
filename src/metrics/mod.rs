//! Metrics Module
//!
//! Counters and latency histograms for inbound requests and upstream calls,
//! exposed in the Prometheus text format.

mod registry;

pub use registry::Metrics;

/// Narrow recording interface the fetcher reports upstream calls through.
///
/// Recording is fire-and-forget: it never fails and never waits on I/O.
pub trait MetricsSink: Send + Sync {
    /// Counts one upstream call for `target` ending in `status`.
    fn record_request(&self, target: &str, status: &str);

    /// Observes the latency of one upstream call in seconds.
    fn observe_duration(&self, target: &str, seconds: f64);
}
