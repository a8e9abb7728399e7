//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog requests (OMDB search/lookup by result)
//! - Search-fetch lifecycle cycles (applied, superseded, short-circuited)
//! - Watched list mutations

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Catalog requests total by operation and result.
pub static CATALOG_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("popcorn_catalog_requests_total", "Total catalog requests"),
        &["operation", "result"], // operation: "search" | "lookup"
    )
    .unwrap()
});

/// Catalog request duration in seconds.
pub static CATALOG_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "popcorn_catalog_request_duration_seconds",
            "Duration of catalog HTTP requests",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

// =============================================================================
// Search Lifecycle Metrics
// =============================================================================

/// Search fetch cycles by outcome.
pub static SEARCH_CYCLES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("popcorn_search_cycles_total", "Search fetch cycles"),
        &["outcome"], // "applied", "error", "superseded", "short_query"
    )
    .unwrap()
});

// =============================================================================
// Watched List Metrics
// =============================================================================

/// Watched list mutations by kind and result.
pub static WATCHED_MUTATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "popcorn_watched_mutations_total",
            "Watched list mutations",
        ),
        &["kind", "result"], // kind: "add" | "delete"
    )
    .unwrap()
});

/// Register all core metrics with the given registry.
pub fn register_core_metrics(registry: &Registry) {
    registry
        .register(Box::new(CATALOG_REQUESTS.clone()))
        .unwrap();
    registry
        .register(Box::new(CATALOG_REQUEST_DURATION.clone()))
        .unwrap();
    registry.register(Box::new(SEARCH_CYCLES.clone())).unwrap();
    registry
        .register(Box::new(WATCHED_MUTATIONS.clone()))
        .unwrap();
}
