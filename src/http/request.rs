//! Request identification and the per-request span.
//!
//! # Responsibilities
//! - Name the request id header shared by both hops
//! - Open the request span and continue the caller's trace in it
//! - Record the final status on the span
//!
//! # Design Decisions
//! - Request id added as early as possible (outermost layer) for tracing
//! - The request span is the parent handed explicitly to every core operation

use std::time::Duration;

use axum::http::{HeaderName, Request, Response};
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::{field::Empty, Span};

use crate::config::Hop;
use crate::observability::continue_trace;

/// Correlation header set on every request and response.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Builds the server span for one inbound request.
#[derive(Debug, Clone, Copy)]
pub struct RequestSpan {
    hop: Hop,
}

impl RequestSpan {
    pub fn new(hop: Hop) -> Self {
        Self { hop }
    }
}

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let request_id = request
            .headers()
            .get(&X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("n/a");

        let span = tracing::info_span!(
            "http.request",
            otel.name = %format!("{} {}", request.method(), request.uri().path()),
            otel.kind = "server",
            hop = %self.hop,
            http.method = %request.method(),
            http.target = %request.uri().path(),
            request_id = %request_id,
            trace_id = Empty,
            http.status_code = Empty,
            latency_ms = Empty,
            otel.status_code = Empty,
            error.message = Empty,
        );
        continue_trace(&span, request.headers());
        span
    }
}

/// Records status and latency on the request span.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordResponse;

impl<B> OnResponse<B> for RecordResponse {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status();
        span.record("http.status_code", status.as_u16());
        span.record("latency_ms", latency.as_millis() as u64);
        if status.is_server_error() {
            span.record("otel.status_code", "ERROR");
        }
        tracing::debug!(
            parent: span,
            status = status.as_u16(),
            latency_ms = latency.as_millis() as u64,
            "Response sent"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_make_span_without_subscriber() {
        let request = Request::builder()
            .uri("/weather/01001000")
            .header(&X_REQUEST_ID, "abc")
            .body(Body::empty())
            .unwrap();
        let span = RequestSpan::new(Hop::Resolver).make_span(&request);
        // No subscriber is installed, so the span is disabled but usable.
        RecordResponse.on_response(&Response::new(()), Duration::from_millis(3), &span);
    }
}
