//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Admissions (tickets issued, rejected during shutdown)
//! - Background hashing jobs (dispatched, outcome, duration, pending)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts};

// =============================================================================
// Admission Metrics
// =============================================================================

/// Tickets issued total.
pub static TICKETS_ISSUED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("hasher_tickets_issued_total", "Total tickets issued").unwrap()
});

/// Admissions rejected because the service is shutting down.
pub static ADMISSIONS_REJECTED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "hasher_admissions_rejected_total",
        "Admissions rejected while shutting down",
    )
    .unwrap()
});

// =============================================================================
// Job Metrics
// =============================================================================

/// Jobs finished total by result.
pub static JOBS_FINISHED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hasher_jobs_finished_total", "Total hashing jobs finished"),
        &["result"], // "stored", "digest_failed", "store_rejected"
    )
    .unwrap()
});

/// Jobs currently dispatched but not finished.
pub static JOBS_PENDING: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "hasher_jobs_pending",
        "Number of dispatched hashing jobs not yet finished",
    )
    .unwrap()
});

/// Wall-clock duration of a job from dispatch to completion, including the delay.
pub static JOB_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "hasher_job_duration_seconds",
            "Duration of hashing jobs from dispatch to completion",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 7.5, 10.0, 30.0]),
        &["result"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Admission
        Box::new(TICKETS_ISSUED.clone()),
        Box::new(ADMISSIONS_REJECTED.clone()),
        // Jobs
        Box::new(JOBS_FINISHED.clone()),
        Box::new(JOBS_PENDING.clone()),
        Box::new(JOB_DURATION.clone()),
    ]
}
