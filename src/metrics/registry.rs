//! Metrics Registry
//!
//! Prometheus metric families for inbound requests and upstream calls.

use prometheus::{
    HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder, DEFAULT_BUCKETS,
};

use crate::metrics::MetricsSink;

const HTTP_REQUESTS: &str = "http_requests_total";
const HTTP_DURATION: &str = "http_request_duration_seconds";
const UPSTREAM_REQUESTS: &str = "external_api_requests_total";
const UPSTREAM_DURATION: &str = "external_api_request_duration_seconds";

// == Metrics ==
/// Shared metrics registry for the whole process.
///
/// Each instance owns its own [`Registry`], so tests never share counters.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    http_requests: IntCounterVec,
    http_durations: HistogramVec,
    upstream_requests: IntCounterVec,
    upstream_durations: HistogramVec,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics").finish_non_exhaustive()
    }
}

impl Metrics {
    /// Creates and registers the four metric families.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new(HTTP_REQUESTS, "Total HTTP requests"),
            &["route", "method", "status"],
        )?;
        let http_durations = HistogramVec::new(
            HistogramOpts::new(HTTP_DURATION, "HTTP request duration")
                .buckets(DEFAULT_BUCKETS.to_vec()),
            &["route", "method"],
        )?;
        let upstream_requests = IntCounterVec::new(
            Opts::new(UPSTREAM_REQUESTS, "External API requests"),
            &["target", "status"],
        )?;
        let upstream_durations = HistogramVec::new(
            HistogramOpts::new(UPSTREAM_DURATION, "External API call duration")
                .buckets(DEFAULT_BUCKETS.to_vec()),
            &["target"],
        )?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_durations.clone()))?;
        registry.register(Box::new(upstream_requests.clone()))?;
        registry.register(Box::new(upstream_durations.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_durations,
            upstream_requests,
            upstream_durations,
        })
    }

    /// Records one served inbound request.
    pub fn record_http(&self, route: &str, method: &str, status: u16, seconds: f64) {
        let status = status.to_string();
        self.http_requests
            .with_label_values(&[route, method, status.as_str()])
            .inc();
        self.http_durations
            .with_label_values(&[route, method])
            .observe(seconds);
    }

    /// Number of upstream calls recorded for `target` with `status`.
    pub fn upstream_requests(&self, target: &str, status: &str) -> u64 {
        self.upstream_requests
            .get_metric_with_label_values(&[target, status])
            .map_or(0, |counter| counter.get())
    }

    /// Number of latency observations recorded for `target`.
    pub fn upstream_observations(&self, target: &str) -> u64 {
        self.upstream_durations
            .get_metric_with_label_values(&[target])
            .map_or(0, |histogram| histogram.get_sample_count())
    }

    /// Number of inbound requests recorded for `route`, `method` and `status`.
    pub fn http_requests(&self, route: &str, method: &str, status: u16) -> u64 {
        let status = status.to_string();
        self.http_requests
            .get_metric_with_label_values(&[route, method, status.as_str()])
            .map_or(0, |counter| counter.get())
    }

    /// Renders every family in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

impl MetricsSink for Metrics {
    fn record_request(&self, target: &str, status: &str) {
        self.upstream_requests
            .with_label_values(&[target, status])
            .inc();
    }

    fn observe_duration(&self, target: &str, seconds: f64) {
        self.upstream_durations
            .with_label_values(&[target])
            .observe(seconds);
    }
}
