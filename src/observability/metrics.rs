//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_requests_total` (counter): requests by method, status, route
//! - `gate_request_duration_seconds` (histogram): latency distribution
//! - `gate_pricing_checks_total` (counter): pricing checks by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("route", route.to_string()),
    ];
    counter!("gate_requests_total", &labels).increment(1);
    histogram!("gate_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record the outcome of a pricing check.
pub fn record_pricing_check(verified: bool) {
    counter!("gate_pricing_checks_total", "verified" => verified.to_string()).increment(1);
}
