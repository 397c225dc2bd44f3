//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_endorsements_total` (counter): peer responses by verdict
//! - `gateway_proposals_total` (counter): proposals by decision
//! - `gateway_queries_total` (counter): queries by outcome
//! - `gateway_commits_total` (counter): commits by outcome
//! - `gateway_request_duration_seconds` (histogram): latency per operation

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one peer response.
pub fn record_endorsement(verdict: &'static str) {
    ::metrics::counter!("gateway_endorsements_total", "verdict" => verdict).increment(1);
}

/// Count one endorsement round.
pub fn record_proposal(decision: &'static str) {
    ::metrics::counter!("gateway_proposals_total", "decision" => decision).increment(1);
}

pub fn record_query(success: bool) {
    ::metrics::counter!("gateway_queries_total", "outcome" => outcome(success)).increment(1);
}

pub fn record_commit(success: bool) {
    ::metrics::counter!("gateway_commits_total", "outcome" => outcome(success)).increment(1);
}

/// Record how long a coordinator operation took.
pub fn record_duration(operation: &'static str, start: Instant) {
    ::metrics::histogram!("gateway_request_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}
