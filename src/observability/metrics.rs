//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): responses by status code
//! - `gateway_rate_limited_total` (counter): 429 rejections by category
//! - `gateway_identity_resolved_total` (counter): requests with an identity
//! - `gateway_identity_failed_total` (counter): lookup failures by strategy

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint started"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus exporter"),
    }
}

pub fn record_request(status: u16) {
    metrics::counter!("gateway_requests_total", "status" => status.to_string()).increment(1);
}

pub fn record_rate_limited(category: &'static str) {
    metrics::counter!("gateway_rate_limited_total", "category" => category).increment(1);
}

pub fn record_identity_resolved() {
    metrics::counter!("gateway_identity_resolved_total").increment(1);
}

pub fn record_identity_failed(strategy: &'static str) {
    metrics::counter!("gateway_identity_failed_total", "strategy" => strategy).increment(1);
}
