//! Per-request metrics.

use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::config::Hop;
use crate::observability::metrics;

pub async fn track_requests(State(hop): State<Hop>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let response = next.run(request).await;
    metrics::record_request(
        hop.as_str(),
        method.as_str(),
        response.status().as_u16(),
        start.elapsed(),
    );
    response
}
