//! Metrics collection and exposition.
//!
//! # Metrics
//! - `upstream_requests_total` (counter): outbound calls by resource, outcome
//! - `upstream_request_duration_seconds` (histogram): outbound latency by resource
//! - `proxy_rejected_requests_total` (counter): inbound requests refused before dispatch
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter is optional and bound to its own address

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::ResourceKind;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one outbound call. `outcome` is `ok` or an error kind label.
pub fn record_upstream_request(kind: ResourceKind, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "upstream_requests_total",
        "resource" => kind.as_str(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "upstream_request_duration_seconds",
        "resource" => kind.as_str()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record an inbound request refused before any upstream call.
pub fn record_rejected(kind: ResourceKind) {
    metrics::counter!("proxy_rejected_requests_total", "resource" => kind.as_str()).increment(1);
}
