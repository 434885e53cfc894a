//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_upstream_requests_total` (counter): attempts by source, outcome
//! - `gateway_upstream_duration_seconds` (histogram): attempt latency by source
//! - `gateway_responses_total` (counter): handler results by source, success
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one upstream attempt. `outcome` is a status code or a failure kind.
pub fn record_upstream_attempt(source: &'static str, outcome: &str, start: Instant) {
    counter!(
        "gateway_upstream_requests_total",
        "source" => source,
        "outcome" => outcome.to_string()
    )
    .increment(1);
    histogram!("gateway_upstream_duration_seconds", "source" => source).record(start.elapsed().as_secs_f64());
}

/// Record the response the handler produced.
pub fn record_response(source: &'static str, success: bool) {
    counter!(
        "gateway_responses_total",
        "source" => source,
        "success" => if success { "true" } else { "false" }
    )
    .increment(1);
}
