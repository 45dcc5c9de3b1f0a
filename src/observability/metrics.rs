//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define proxy metrics (requests, latency, upstream calls, enrichment outcomes)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `catalog_requests_total` (counter): search requests by response status
//! - `catalog_request_duration_seconds` (histogram): end-to-end latency
//! - `catalog_upstream_calls_total` (counter): upstream calls by operation, outcome
//! - `catalog_upstream_duration_seconds` (histogram): upstream latency by operation
//! - `catalog_enrichment_items_total` (counter): enriched items by outcome
//! - `catalog_enrichment_failures_total` (counter): enrichment failures by reason
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so library code and
//!   tests never need a metrics backend

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its HTTP scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed search request.
pub fn record_request(status: u16, start: Instant) {
    let status = status.to_string();
    counter!("catalog_requests_total", "status" => status).increment(1);
    histogram!("catalog_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one upstream call (`list` or `detail`).
pub fn record_upstream_call(operation: &'static str, outcome: &'static str, start: Instant) {
    counter!("catalog_upstream_calls_total", "operation" => operation, "outcome" => outcome).increment(1);
    histogram!("catalog_upstream_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome counts of one enrichment run.
pub fn record_enrichment(fulfilled: usize, rejected: usize) {
    counter!("catalog_enrichment_items_total", "outcome" => "fulfilled").increment(fulfilled as u64);
    counter!("catalog_enrichment_items_total", "outcome" => "rejected").increment(rejected as u64);
}

/// Record why a single item kept its base form.
pub fn record_enrichment_failure(reason: &'static str) {
    counter!("catalog_enrichment_failures_total", "reason" => reason).increment(1);
}
