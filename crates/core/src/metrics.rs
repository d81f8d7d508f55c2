//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Catalog scans (count by trigger, duration, skipped folders)
//! - Search cache (lookups by outcome, invalidations)
//! - Tag file writes

use once_cell::sync::Lazy;
use prometheus::{Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Catalog Scans
// =============================================================================

/// Full filesystem scans by trigger.
pub static SCANS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vidshelf_scans_total", "Total catalog scans"),
        &["trigger"], // "forced", "stale"
    )
    .unwrap()
});

/// Scan duration in seconds.
pub static SCAN_DURATION: Lazy<Histogram> = Lazy::new(|| {
    Histogram::with_opts(
        HistogramOpts::new("vidshelf_scan_duration_seconds", "Duration of catalog scans")
            .buckets(vec![0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
    )
    .unwrap()
});

/// Folders skipped because they hold no video file.
pub static FOLDERS_SKIPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "vidshelf_folders_skipped_total",
        "Folders skipped during scans (no video file)",
    )
    .unwrap()
});

// =============================================================================
// Search Cache
// =============================================================================

/// Search cache lookups by outcome.
pub static SEARCH_CACHE_LOOKUPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vidshelf_search_cache_lookups_total", "Search cache lookups"),
        &["result"], // "hit", "miss", "expired"
    )
    .unwrap()
});

/// Full search cache clears.
pub static SEARCH_CACHE_INVALIDATIONS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "vidshelf_search_cache_invalidations_total",
        "Times the search cache was cleared",
    )
    .unwrap()
});

// =============================================================================
// Tags
// =============================================================================

/// Failed tag file writes.
pub static TAG_WRITE_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "vidshelf_tag_write_failures_total",
        "Tag file writes that failed",
    )
    .unwrap()
});

/// All core metrics, for registration in the server's registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(SCANS_TOTAL.clone()),
        Box::new(SCAN_DURATION.clone()),
        Box::new(FOLDERS_SKIPPED.clone()),
        Box::new(SEARCH_CACHE_LOOKUPS.clone()),
        Box::new(SEARCH_CACHE_INVALIDATIONS.clone()),
        Box::new(TAG_WRITE_FAILURES.clone()),
    ]
}
