//! Prometheus metrics for reconciliation runs.
//!
//! This module provides metrics for:
//! - Seasons reconciled, by resulting status
//! - Seasons skipped, by failure reason
//! - Catalog lookup latency

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Reconciliation
// =============================================================================

/// Seasons reconciled by status.
pub static SEASONS_RECONCILED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "seasonwatch_seasons_reconciled_total",
            "Total seasons reconciled",
        ),
        &["status"], // "complete", "incomplete", "watching_incomplete", "watching_complete"
    )
    .unwrap()
});

/// Seasons left out of the report because their aired count was unavailable.
pub static SEASONS_SKIPPED: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "seasonwatch_seasons_skipped_total",
            "Total seasons skipped after a catalog failure",
        ),
        &["reason"], // "unavailable", "unknown_series", "not_configured"
    )
    .unwrap()
});

/// Missing episodes found across all seasons.
pub static MISSING_EPISODES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "seasonwatch_missing_episodes_total",
        "Total aired episodes missing from the library",
    )
    .unwrap()
});

// =============================================================================
// Catalog
// =============================================================================

/// Catalog lookup duration in seconds.
pub static CATALOG_LOOKUP_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "seasonwatch_catalog_lookup_duration_seconds",
            "Duration of catalog season lookups",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["result"], // "success", "failure"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SEASONS_RECONCILED.clone()),
        Box::new(SEASONS_SKIPPED.clone()),
        Box::new(MISSING_EPISODES.clone()),
        Box::new(CATALOG_LOOKUP_DURATION.clone()),
    ]
}
