//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cep_requests_total` (counter): inbound requests by hop, method, status
//! - `cep_request_duration_seconds` (histogram): inbound latency by hop
//! - `cep_upstream_requests_total` (counter): provider and forward calls by stage, outcome
//!
//! Without an installed recorder every call here is a no-op, so handlers
//! record unconditionally.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::error::{DomainError, DomainResult, Stage};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Needs a running Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one handled inbound request.
pub fn record_request(hop: &'static str, method: &str, status: u16, latency: Duration) {
    metrics::counter!(
        "cep_requests_total",
        "hop" => hop,
        "method" => method.to_owned(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("cep_request_duration_seconds", "hop" => hop)
        .record(latency.as_secs_f64());
}

/// Record the outcome of one upstream call.
pub fn record_upstream<T>(stage: Stage, result: &DomainResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(DomainError::NotFound) => "not_found",
        Err(_) => "error",
    };
    metrics::counter!(
        "cep_upstream_requests_total",
        "stage" => stage.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}
