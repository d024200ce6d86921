//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define relay metrics (requests, latency, upstream failures, cookie rewrites)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `relay_requests_total` (counter): total requests by method, status
//! - `relay_request_duration_seconds` (histogram): latency distribution by method
//! - `relay_upstream_failures_total` (counter): transport failures answered with 502
//! - `relay_cookies_rewritten_total` (counter): Set-Cookie directives re-emitted on login
//!
//! # Design Decisions
//! - Recording without an installed exporter is a no-op
//! - The exporter is opt-in via `observability.metrics_enabled`

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and start its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("relay_request_duration_seconds", "method" => method.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_failure() {
    counter!("relay_upstream_failures_total").increment(1);
}

pub fn record_cookies_rewritten(count: usize) {
    counter!("relay_cookies_rewritten_total").increment(count as u64);
}
