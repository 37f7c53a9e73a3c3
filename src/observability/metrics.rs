//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gate metrics (requests by outcome, latency, identity refreshes)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `gate_requests_total` (counter): requests by outcome, status
//! - `gate_request_duration_seconds` (histogram): end-to-end latency by outcome
//! - `gate_identity_refresh_total` (counter): refresh calls by result
//! - `gate_identity_refresh_duration_seconds` (histogram): refresh latency
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op, so tests need no setup
//! - Labels are low-cardinality (outcome, status, result); never the path

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    counter!(
        "gate_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gate_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record one identity provider call.
pub fn record_identity_refresh(result: &'static str, start: Instant) {
    counter!("gate_identity_refresh_total", "result" => result).increment(1);
    histogram!("gate_identity_refresh_duration_seconds", "result" => result)
        .record(start.elapsed().as_secs_f64());
}
