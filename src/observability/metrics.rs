//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (RPS, latency, upstream errors, registry size)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status, service
//! - `gateway_request_duration_seconds` (histogram): latency distribution
//! - `gateway_upstream_errors_total` (counter): failures by service, kind
//! - `gateway_registered_services` (gauge): size of the registry
//!
//! # Design Decisions
//! - Without an installed recorder every call is a no-op
//! - Labels for method, service, status code

use std::net::SocketAddr;
use std::time::Instant;

use metrics::Label;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, service: &str, start: Instant) {
    let labels = vec![
        Label::new("method", method.to_string()),
        Label::new("status", status.to_string()),
        Label::new("service", service.to_string()),
    ];
    metrics::counter!("gateway_requests_total", labels.clone()).increment(1);
    metrics::histogram!("gateway_request_duration_seconds", labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed upstream round trip.
pub fn record_upstream_error(service: &str, kind: &'static str) {
    metrics::counter!(
        "gateway_upstream_errors_total",
        "service" => service.to_string(),
        "kind" => kind
    )
    .increment(1);
}

pub fn record_registered_services(count: usize) {
    metrics::gauge!("gateway_registered_services").set(count as f64);
}
