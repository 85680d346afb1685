//! Metrics collection and exposition.
//!
//! # Metrics
//! - `broker_requests_total` (counter): requests by operation, status
//! - `broker_request_duration_seconds` (histogram): latency distribution
//! - `broker_bind_failures_total` (counter): binds that resolved nothing
//!
//! # Design Decisions
//! - Recorded by one middleware keyed on the matched route
//! - Without an installed recorder every macro is a no-op

use std::net::SocketAddr;
use std::time::Instant;

use axum::{body::Body, extract::MatchedPath, http::Request, middleware::Next, response::Response};
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one finished request.
pub fn record_request(operation: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!(
        "broker_requests_total",
        "operation" => operation.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "broker_request_duration_seconds",
        "operation" => operation.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_bind_failure(error_key: &'static str) {
    counter!("broker_bind_failures_total", "error" => error_key).increment(1);
}

/// Middleware recording every request under its route template.
pub async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let operation = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| format!("{} {}", request.method(), path.as_str()))
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    record_request(&operation, response.status().as_u16(), start);
    response
}
