//! Metrics collection and monitoring for indexd
//!
//! This module provides metrics collection using Prometheus, optimized for
//! minimal overhead on the lookup hot path.

use crate::core::error::Result;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_gauge, IntCounter, IntGauge};

/// Index metrics covering lookups and refreshes
pub struct IndexMetrics {
    /// Total number of lookups served
    pub lookups_total: IntCounter,
    /// Lookups that produced a position (exact or within tolerance)
    pub lookups_found: IntCounter,
    /// Lookups that produced no position
    pub lookups_not_found: IntCounter,
    /// Successful snapshot refreshes
    pub refresh_success: IntCounter,
    /// Failed snapshot refreshes
    pub refresh_failures: IntCounter,
    /// Dataset tokens that failed to parse and were substituted with zero
    pub parse_anomalies: IntCounter,
    /// Number of values in the published snapshot
    pub snapshot_size: IntGauge,
    /// Unix time of the last successful refresh
    pub last_refresh_timestamp: IntGauge,
}

/// HTTP metrics for the API listener
pub struct HttpMetrics {
    /// Total search requests received
    pub search_requests: IntCounter,
    /// Search requests rejected for a non-integer parameter
    pub invalid_requests: IntCounter,
}

/// Centralized metrics collection for all system components
pub struct Metrics {
    /// Index lookup and refresh metrics
    pub index: IndexMetrics,
    /// HTTP request metrics
    pub http: HttpMetrics,
}

impl Metrics {
    /// Create new metrics instance
    pub fn new() -> Result<Self> {
        Ok(Self {
            index: IndexMetrics::new()?,
            http: HttpMetrics::new()?,
        })
    }

    /// Get the global metrics instance
    pub fn global() -> &'static Metrics {
        static INSTANCE: Lazy<Metrics> =
            Lazy::new(|| Metrics::new().expect("Failed to initialize metrics"));
        &INSTANCE
    }
}

impl IndexMetrics {
    /// Create a new IndexMetrics instance with registered Prometheus metrics
    fn new() -> Result<Self> {
        Ok(Self {
            lookups_total: register_int_counter!(
                "idx_lookups_total",
                "Total number of lookups served"
            )?,
            lookups_found: register_int_counter!(
                "idx_lookups_found_total",
                "Lookups that produced a position"
            )?,
            lookups_not_found: register_int_counter!(
                "idx_lookups_not_found_total",
                "Lookups that produced no position"
            )?,
            refresh_success: register_int_counter!(
                "idx_refresh_success_total",
                "Successful snapshot refreshes"
            )?,
            refresh_failures: register_int_counter!(
                "idx_refresh_failures_total",
                "Failed snapshot refreshes"
            )?,
            parse_anomalies: register_int_counter!(
                "idx_parse_anomalies_total",
                "Dataset tokens substituted with zero"
            )?,
            snapshot_size: register_int_gauge!(
                "idx_snapshot_size",
                "Number of values in the published snapshot"
            )?,
            last_refresh_timestamp: register_int_gauge!(
                "idx_last_refresh_timestamp_seconds",
                "Unix time of the last successful refresh"
            )?,
        })
    }
}

impl HttpMetrics {
    /// Create a new HttpMetrics instance with registered Prometheus metrics
    fn new() -> Result<Self> {
        Ok(Self {
            search_requests: register_int_counter!(
                "idx_http_search_requests_total",
                "Total search requests received"
            )?,
            invalid_requests: register_int_counter!(
                "idx_http_invalid_requests_total",
                "Search requests rejected for a bad parameter"
            )?,
        })
    }
}

/// Initialize the metrics registry by creating the global metrics instance
///
/// This function should be called once during application startup to ensure
/// all metrics are registered before the first scrape.
pub fn init_registry() {
    // Initialize global metrics to register them
    let _ = Metrics::global();
}

/// Collect and return all metrics as a Prometheus-formatted string
///
/// Gathers every registered metric and renders it in the Prometheus text
/// exposition format for the metrics endpoint.
pub fn collect_metrics() -> String {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder.encode_to_string(&metric_families).unwrap_or_default()
}
