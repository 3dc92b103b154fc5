//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): responses by status code
//! - `relay_request_duration_seconds` (histogram): end-to-end latency
//! - `relay_bytes_streamed_total` (counter): upstream bytes forwarded to callers
//!
//! # Design Decisions
//! - Metric updates are cheap atomic operations; recording is safe even
//!   when no exporter is installed (the macros no-op)
//! - The exporter runs on its own address, away from relay traffic

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(error) => tracing::error!(error = %error, "Failed to start metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(status: u16, start_time: Instant) {
    counter!("relay_requests_total", "status" => status.to_string()).increment(1);
    histogram!("relay_request_duration_seconds").record(start_time.elapsed().as_secs_f64());
}

/// Record bytes forwarded by a body transfer, at its terminal outcome.
pub fn record_streamed_bytes(bytes: u64) {
    counter!("relay_bytes_streamed_total").increment(bytes);
}
