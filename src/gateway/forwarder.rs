//! Outbound call to the resolver hop.

use axum::body::Bytes;
use axum::http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode};
use serde::Serialize;
use tracing::{field::Empty, Instrument, Span};

use crate::cep::{PostalCode, PostalCodeShape};
use crate::error::{DomainError, DomainResult, Stage};
use crate::http::request::X_REQUEST_ID;
use crate::observability::{inject_span_context, metrics, record_error};

/// Resolver endpoint the gateway posts to, relative to its base URL.
pub const WEATHER_PATH: &str = "/weather";

#[derive(Serialize)]
struct ForwardBody<'a> {
    cep: &'a str,
}

/// Downstream response, kept as received.
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Forwards validated postal codes to the resolver hop.
#[derive(Debug, Clone)]
pub struct Forwarder {
    http: reqwest::Client,
    weather_url: String,
    shape: PostalCodeShape,
}

impl Forwarder {
    pub fn new(http: reqwest::Client, service_b_url: &str, shape: PostalCodeShape) -> Self {
        Self {
            http,
            weather_url: format!("{}{}", service_b_url.trim_end_matches('/'), WEATHER_PATH),
            shape,
        }
    }

    pub fn weather_url(&self) -> &str {
        &self.weather_url
    }

    /// Validate `raw` and, if it passes, forward it once.
    ///
    /// Returns `InvalidInput` without touching the network for a bad shape,
    /// and a `Forward` stage failure when the call itself fails. Any status
    /// the resolver answers with, including errors, is a success here.
    pub async fn forward(
        &self,
        parent: &Span,
        raw: &str,
        request_id: Option<&HeaderValue>,
    ) -> DomainResult<Forwarded> {
        let code = PostalCode::parse(raw, self.shape).inspect_err(|e| record_error(parent, e))?;

        let span = tracing::info_span!(
            parent: parent,
            "forward.weather",
            otel.kind = "client",
            cep = %code,
            service_b.url = %self.weather_url,
            http.status_code = Empty,
            otel.status_code = Empty,
            error.message = Empty,
        );

        let result = self
            .send(&span, &code, request_id)
            .instrument(span.clone())
            .await;
        if let Err(e) = &result {
            record_error(&span, e);
        }
        metrics::record_upstream(Stage::Forward, &result);
        result
    }

    async fn send(
        &self,
        span: &Span,
        code: &PostalCode,
        request_id: Option<&HeaderValue>,
    ) -> DomainResult<Forwarded> {
        let mut headers = HeaderMap::new();
        inject_span_context(span, &mut headers);
        if let Some(id) = request_id {
            headers.insert(X_REQUEST_ID, id.clone());
        }

        let response = self
            .http
            .post(&self.weather_url)
            .headers(headers)
            .json(&ForwardBody { cep: code.as_str() })
            .send()
            .await
            .map_err(|e| {
                DomainError::upstream(Stage::Forward, format!("failed to call service B: {e}"))
            })?;

        let status = response.status();
        span.record("http.status_code", status.as_u16());
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                let reason = format!("failed to read service B response: {e}");
                DomainError::upstream(Stage::Forward, reason)
            })?;

        tracing::debug!(status = %status, bytes = body.len(), "Service B responded");
        Ok(Forwarded {
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_url_joins_base() {
        let client = reqwest::Client::new();
        let forwarder =
            Forwarder::new(client.clone(), "http://service-b:8081", PostalCodeShape::Strict);
        assert_eq!(forwarder.weather_url(), "http://service-b:8081/weather");

        let forwarder = Forwarder::new(client, "http://service-b:8081/", PostalCodeShape::Strict);
        assert_eq!(forwarder.weather_url(), "http://service-b:8081/weather");
    }

    #[tokio::test]
    async fn test_invalid_code_never_dials() {
        // Port 9 (discard) would fail to connect; InvalidInput proves no attempt was made.
        let forwarder =
            Forwarder::new(reqwest::Client::new(), "http://127.0.0.1:9", PostalCodeShape::Strict);
        for raw in ["123", "0100100a", "010010000", ""] {
            let err = forwarder.forward(&Span::none(), raw, None).await.unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput), "{raw:?}");
        }
    }

    #[tokio::test]
    async fn test_unreachable_service_b_is_forward_failure() {
        let forwarder =
            Forwarder::new(reqwest::Client::new(), "http://127.0.0.1:1", PostalCodeShape::Strict);
        let err = forwarder
            .forward(&Span::none(), "01001000", None)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Forward));
        assert_eq!(err.public_message(), "error forwarding to service B");
    }
}
