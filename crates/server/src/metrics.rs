//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the hashing server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Service state and stored results (collected dynamically)
//! - Core admission and job metrics (registered from `hasher_core::metrics`)

use anyhow::Context;
use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;

use crate::state::AppState;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "hasher_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hasher_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "hasher_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Service Metrics (collected dynamically)
// =============================================================================

/// Whether shutdown has started (1) or the service is accepting work (0).
pub static SERVICE_DRAINING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "hasher_service_draining",
        "Whether shutdown has started (1) or the service accepts work (0)",
    )
    .unwrap()
});

/// Results currently held in the result store.
pub static RESULTS_STORED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("hasher_results_stored", "Number of stored digests").unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Service
    registry
        .register(Box::new(SERVICE_DRAINING.clone()))
        .unwrap();
    registry
        .register(Box::new(RESULTS_STORED.clone()))
        .unwrap();

    // Core metrics (admissions, jobs)
    for metric in hasher_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> anyhow::Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .context("Failed to encode metrics")?;
    String::from_utf8(buffer).context("Metrics output is not UTF-8")
}

/// Collect dynamic metrics from current application state.
pub fn collect_dynamic_metrics(state: &AppState) {
    let service = state.service();
    SERVICE_DRAINING.set(if service.shutdown().is_accepting() { 0 } else { 1 });
    RESULTS_STORED.set(service.store().len() as i64);
}

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/-?\d+(/|$)").unwrap());

/// Normalize a path for metric labels (replace numeric ids with placeholders).
pub fn normalize_path(path: &str) -> String {
    NUMERIC_SEGMENT.replace_all(path, "/{id}$1").to_string()
}
