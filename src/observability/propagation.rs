//! Trace context propagation across the hop boundary.
//!
//! The gateway injects the context of its forward span into the outbound
//! request headers; the resolver extracts it and makes its request span a
//! child of the gateway's. Spans are always passed in explicitly; nothing here
//! reads `Span::current()`.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::{
    global,
    propagation::{Extractor, Injector},
};
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::error::DomainError;

/// W3C Trace Context header name.
pub const TRACEPARENT: &str = "traceparent";

struct HeaderInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        let Ok(name) = HeaderName::from_bytes(key.as_bytes()) else {
            tracing::debug!(%key, "failed to parse header name");
            return;
        };
        let Ok(value) = HeaderValue::from_str(&value) else {
            tracing::debug!(%value, "failed to parse header value");
            return;
        };
        self.0.insert(name, value);
    }
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }
}

/// Write the trace context of `span` into `headers`.
pub fn inject_span_context(span: &Span, headers: &mut HeaderMap) {
    let context = span.context();
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&context, &mut HeaderInjector(headers));
    });
}

/// Make `span` a child of the trace context carried by `headers`, if any.
pub fn continue_trace(span: &Span, headers: &HeaderMap) {
    let parent = global::get_text_map_propagator(|propagator| {
        propagator.extract(&HeaderExtractor(headers))
    });
    let _ = span.set_parent(parent);

    if let Some(trace_id) = headers
        .get(TRACEPARENT)
        .and_then(|v| v.to_str().ok())
        .and_then(trace_id_from_traceparent)
    {
        span.record("trace_id", trace_id);
    }
}

/// Trace id of a `traceparent` value ("00-{trace_id}-{span_id}-{flags}").
pub fn trace_id_from_traceparent(traceparent: &str) -> Option<&str> {
    let mut parts = traceparent.split('-');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some("00"), Some(trace_id), Some(_), Some(_)) if trace_id.len() == 32 => Some(trace_id),
        _ => None,
    }
}

/// Mark `span` as failed and log the cause.
///
/// The span must declare `otel.status_code` and `error.message` fields.
pub fn record_error(span: &Span, error: &DomainError) {
    span.record("otel.status_code", "ERROR");
    span.record("error.message", tracing::field::display(error));

    if error.status().is_server_error() {
        tracing::error!(parent: span, error = %error, stage = ?error.stage(), "request failed");
    } else {
        tracing::info!(parent: span, error = %error, "request rejected");
    }
}
