//! Metrics collection and exposition.
//!
//! # Metrics
//! - `couch_relay_upstream_requests_total` (counter): upstream calls by doc type, status
//! - `couch_relay_upstream_duration_seconds` (histogram): upstream latency by doc type
//!
//! Transport failures are recorded with status `error`.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one upstream call.
pub fn record_upstream(doc_type: &str, status: Option<u16>, start: Instant) {
    let status = status.map_or_else(|| "error".to_string(), |s| s.to_string());
    ::metrics::counter!(
        "couch_relay_upstream_requests_total",
        "doc_type" => doc_type.to_string(),
        "status" => status
    )
    .increment(1);
    ::metrics::histogram!(
        "couch_relay_upstream_duration_seconds",
        "doc_type" => doc_type.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
