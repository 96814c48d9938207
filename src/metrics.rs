//! Lookup Metrics
//!
//! Prometheus counters and latency histograms for the cached and uncached
//! lookup paths, labelled by named cache.

use std::fmt;
use std::time::Duration;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::error::{AppError, Result};

/// Lookup latency buckets (seconds)
/// Covers: 50µs, 100µs, 250µs, 500µs, 1ms, 2.5ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 1s
const LOOKUP_LATENCY_BUCKETS: &[f64] = &[
    0.000_05, 0.000_1, 0.000_25, 0.000_5, 0.001, 0.002_5, 0.005, 0.010, 0.025, 0.050, 0.100,
    0.250, 1.0,
];

/// Which read path a lookup took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPath {
    Cached,
    Uncached,
}

impl LookupPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupPath::Cached => "cached",
            LookupPath::Uncached => "uncached",
        }
    }
}

impl fmt::Display for LookupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The dependency whose call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSource {
    Store,
    Backend,
}

impl ErrorSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorSource::Store => "store",
            ErrorSource::Backend => "backend",
        }
    }
}

/// Request, error and latency metrics for product lookups.
///
/// Each instance owns its registry so several services (and tests) can
/// coexist in one process.
#[derive(Clone)]
pub struct LookupMetrics {
    registry: Registry,

    /// Lookup counter - labels: cache, path
    requests_total: IntCounterVec,

    /// Failed dependency calls - labels: cache, path, source
    errors_total: IntCounterVec,

    /// Lookup duration histogram - labels: cache, path
    duration_seconds: HistogramVec,
}

impl LookupMetrics {
    /// Creates the metrics and registers them with a fresh registry.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "product_lookup_requests_total",
                "Total number of product lookups",
            ),
            &["cache", "path"],
        )
        .map_err(|e| metric_error("product_lookup_requests_total", e))?;

        let errors_total = IntCounterVec::new(
            Opts::new(
                "product_lookup_errors_total",
                "Failed store or cache backend calls during product lookups",
            ),
            &["cache", "path", "source"],
        )
        .map_err(|e| metric_error("product_lookup_errors_total", e))?;

        let duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "product_lookup_duration_seconds",
                "Product lookup duration in seconds",
            )
            .buckets(LOOKUP_LATENCY_BUCKETS.to_vec()),
            &["cache", "path"],
        )
        .map_err(|e| metric_error("product_lookup_duration_seconds", e))?;

        registry
            .register(Box::new(requests_total.clone()))
            .map_err(|e| metric_error("product_lookup_requests_total", e))?;
        registry
            .register(Box::new(errors_total.clone()))
            .map_err(|e| metric_error("product_lookup_errors_total", e))?;
        registry
            .register(Box::new(duration_seconds.clone()))
            .map_err(|e| metric_error("product_lookup_duration_seconds", e))?;

        Ok(Self {
            registry,
            requests_total,
            errors_total,
            duration_seconds,
        })
    }

    pub fn record_request(&self, cache: &str, path: LookupPath) {
        self.requests_total
            .with_label_values(&[cache, path.as_str()])
            .inc();
    }

    pub fn record_error(&self, cache: &str, path: LookupPath, source: ErrorSource) {
        self.errors_total
            .with_label_values(&[cache, path.as_str(), source.as_str()])
            .inc();
    }

    pub fn observe_latency(&self, cache: &str, path: LookupPath, elapsed: Duration) {
        self.duration_seconds
            .with_label_values(&[cache, path.as_str()])
            .observe(elapsed.as_secs_f64());
    }

    pub fn requests(&self, cache: &str, path: LookupPath) -> u64 {
        self.requests_total
            .with_label_values(&[cache, path.as_str()])
            .get()
    }

    pub fn errors(&self, cache: &str, path: LookupPath, source: ErrorSource) -> u64 {
        self.errors_total
            .with_label_values(&[cache, path.as_str(), source.as_str()])
            .get()
    }

    /// Number of latency observations recorded for a path.
    pub fn latency_samples(&self, cache: &str, path: LookupPath) -> u64 {
        self.duration_seconds
            .with_label_values(&[cache, path.as_str()])
            .get_sample_count()
    }

    /// Encodes every metric in the Prometheus text exposition format.
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| AppError::Internal(format!("Failed to encode metrics: {}", e)))?;
        String::from_utf8(buffer)
            .map_err(|e| AppError::Internal(format!("Metrics are not valid UTF-8: {}", e)))
    }
}

fn metric_error(name: &str, err: prometheus::Error) -> AppError {
    AppError::Internal(format!("Failed to register {}: {}", name, err))
}
