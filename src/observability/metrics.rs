//! Metrics collection and exposition.
//!
//! # Metrics
//! - `priority_classifications_total` (counter): classifications by policy, label
//! - `proxy_requests_total` (counter): requests by method, status, pool
//! - `proxy_request_duration_seconds` (histogram): latency by pool
//! - `proxy_rejected_total` (counter): refusals by reason

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
///
/// Failure to install is logged and otherwise ignored: metrics are an
/// observability port, not a startup requirement.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "failed to install metrics exporter"),
    }
}

/// Count one classification outcome.
pub fn record_classification(policy: &'static str, label: &str) {
    metrics::counter!(
        "priority_classifications_total",
        "policy" => policy,
        "label" => label.to_string()
    )
    .increment(1);
}

/// Count one completed request and record its latency.
pub fn record_request(method: &str, status: u16, pool: &str, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "pool" => pool.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "proxy_request_duration_seconds",
        "pool" => pool.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Count one refused request.
pub fn record_rejected(reason: &'static str) {
    metrics::counter!("proxy_rejected_total", "reason" => reason).increment(1);
}
