//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the vidshelf server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Catalog size (collected on scrape)
//! - Core scan and search cache metrics (registered from `vidshelf_core`)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

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
            "vidshelf_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("vidshelf_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "vidshelf_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

// =============================================================================
// Catalog Metrics (collected dynamically)
// =============================================================================

/// Videos in the persisted catalog.
pub static CATALOG_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "vidshelf_catalog_entries",
        "Number of videos in the persisted catalog",
    )
    .unwrap()
});

/// Cached search terms.
pub static SEARCH_CACHE_ENTRIES: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "vidshelf_search_cache_entries",
        "Number of cached search terms",
    )
    .unwrap()
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

    // Catalog
    registry
        .register(Box::new(CATALOG_ENTRIES.clone()))
        .unwrap();
    registry
        .register(Box::new(SEARCH_CACHE_ENTRIES.clone()))
        .unwrap();

    // Core metrics (scans, search cache, tag writes)
    for metric in vidshelf_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect the library at scrape time.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    if let Ok(stats) = state.library().stats() {
        CATALOG_ENTRIES.set(stats.video_count as i64);
        SEARCH_CACHE_ENTRIES.set(stats.cached_searches as i64);
    }
}

/// Label for requests that matched no route.
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Metric label for a request: the matched route template, a single label for
/// all media files, or [`UNMATCHED_ROUTE`].
pub fn route_label(path: &str, matched: Option<&str>) -> String {
    if path.starts_with(&format!("{}/", vidshelf_core::MEDIA_ROUTE)) {
        return format!("{}/{{file}}", vidshelf_core::MEDIA_ROUTE);
    }
    matched.unwrap_or(UNMATCHED_ROUTE).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_label_uses_matched_template() {
        assert_eq!(
            route_label("/api/videos/cat_video", Some("/api/videos/{id}")),
            "/api/videos/{id}"
        );
        assert_eq!(
            route_label("/api/videos/search", Some("/api/videos/search")),
            "/api/videos/search"
        );
    }

    #[test]
    fn test_route_label_media_files() {
        assert_eq!(
            route_label("/videos/cat_video/clip.mp4", None),
            "/videos/{file}"
        );
        assert_eq!(
            route_label("/videos/a/b.mp4", Some("/videos/{*rest}")),
            "/videos/{file}"
        );
    }

    #[test]
    fn test_route_label_unmatched_paths_share_one_label() {
        assert_eq!(route_label("/wp-admin/x1", None), UNMATCHED_ROUTE);
        assert_eq!(route_label("/wp-admin/x2", None), UNMATCHED_ROUTE);
        assert_eq!(route_label("/api/videos/a/b/c", None), UNMATCHED_ROUTE);
        assert_eq!(route_label("/videosX", None), UNMATCHED_ROUTE);
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("vidshelf_http_requests_total"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_contains_core_metrics() {
        vidshelf_core::metrics::SCANS_TOTAL
            .with_label_values(&["forced"])
            .inc();
        vidshelf_core::metrics::SEARCH_CACHE_INVALIDATIONS.inc();
        CATALOG_ENTRIES.set(0);

        let output = encode_metrics();
        assert!(output.contains("vidshelf_scans_total"));
        assert!(output.contains("vidshelf_search_cache_invalidations_total"));
        assert!(output.contains("vidshelf_catalog_entries"));
    }
}
