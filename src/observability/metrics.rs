//! Metrics collection and exposition.
//!
//! # Metrics
//! - `lb_compilations_total` (counter): compilations by result (ok, invalid, render_error)
//! - `lb_write_failures_total` (counter): rendered documents that could not be delivered
//! - `lb_render_failures_total` (counter): renderer failures
//! - `lb_routing_entries` (gauge): entries in the last compiled model
//! - `lb_backend_endpoints` (gauge): backend endpoints in the last compiled model

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_compilation(result: &'static str) {
    counter!("lb_compilations_total", "result" => result).increment(1);
}

pub fn record_model(entries: usize, endpoints: usize) {
    gauge!("lb_routing_entries").set(entries as f64);
    gauge!("lb_backend_endpoints").set(endpoints as f64);
}

pub fn record_render_failure() {
    counter!("lb_render_failures_total").increment(1);
}

pub fn record_write_failure() {
    counter!("lb_write_failures_total").increment(1);
}
