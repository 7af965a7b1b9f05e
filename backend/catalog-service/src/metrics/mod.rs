//! Prometheus metrics for catalog-service.
//!
//! Collectors register with the default registry; the serving layer decides
//! where to expose them.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, Encoder, Histogram,
    HistogramVec, IntCounterVec, TextEncoder,
};

lazy_static! {
    /// Catalog requests by operation and sort strategy, counted before validation.
    pub static ref CATALOG_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "catalog_request_total",
        "Total catalog requests segmented by operation and sort strategy",
        &["operation", "strategy"]
    )
    .expect("failed to register catalog_request_total");

    /// Failed catalog requests by operation and error kind.
    pub static ref CATALOG_REQUEST_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "catalog_request_errors_total",
        "Failed catalog requests segmented by operation and error kind",
        &["operation", "kind"]
    )
    .expect("failed to register catalog_request_errors_total");

    /// Store round-trip duration per operation.
    pub static ref CATALOG_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "catalog_request_duration_seconds",
        "Catalog request duration segmented by operation",
        &["operation"]
    )
    .expect("failed to register catalog_request_duration_seconds");

    /// Number of records returned per page.
    pub static ref CATALOG_PAGE_ITEMS: Histogram = register_histogram!(
        "catalog_page_items",
        "Number of records returned per catalog page",
        vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0, 100.0]
    )
    .expect("failed to register catalog_page_items");
}

/// Render every registered metric in the Prometheus text format.
pub fn render() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();

    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| e.to_string())?;

    String::from_utf8(buffer).map_err(|e| e.to_string())
}
