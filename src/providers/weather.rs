//! WeatherAPI current-conditions lookup.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{field::Empty, Instrument, Span};

use crate::cep::normalize_city_name;
use crate::error::{DomainError, DomainResult, Stage};
use crate::observability::{metrics, record_error};
use crate::providers::TemperatureProvider;

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    current: Current,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
}

/// Client for the WeatherAPI `current.json` endpoint.
#[derive(Clone)]
pub struct WeatherApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl WeatherApiClient {
    /// A blank `api_key` counts as absent.
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        }
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    async fn current_celsius(&self, span: &Span, api_key: &str, city: &str) -> DomainResult<f64> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("key", api_key), ("q", city), ("aqi", "no")])
            .send()
            .await
            // Strip the URL: it carries the credential.
            .map_err(|e| {
                let reason = format!("failed to get weather info: {}", e.without_url());
                DomainError::upstream(Stage::Weather, reason)
            })?;

        let status = response.status();
        span.record("http.status_code", status.as_u16());
        if status != StatusCode::OK {
            return Err(DomainError::upstream(
                Stage::Weather,
                format!("weather API returned status {status}"),
            ));
        }

        let payload: CurrentConditions = response.json().await.map_err(|e| {
            DomainError::upstream(
                Stage::Weather,
                format!("failed to decode weather response: {}", e.without_url()),
            )
        })?;

        span.record("temperature.celsius", payload.current.temp_c);
        Ok(payload.current.temp_c)
    }
}

// Manual impl keeps the credential out of logs.
impl std::fmt::Debug for WeatherApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherApiClient")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl TemperatureProvider for WeatherApiClient {
    async fn resolve_temperature(&self, parent: &Span, city: &str) -> DomainResult<f64> {
        let normalized = normalize_city_name(city);
        let span = tracing::info_span!(
            parent: parent,
            "weatherapi.current",
            otel.kind = "client",
            city.original = %city,
            city.normalized = %normalized,
            weather.api.url = %self.base_url,
            http.status_code = Empty,
            temperature.celsius = Empty,
            otel.status_code = Empty,
            error.message = Empty,
        );

        let result = match self.api_key.as_deref() {
            Some(api_key) => {
                self.current_celsius(&span, api_key, &normalized)
                    .instrument(span.clone())
                    .await
            }
            None => Err(DomainError::Misconfigured {
                stage: Stage::Weather,
                reason: "weather API key not configured",
            }),
        };

        if let Err(e) = &result {
            record_error(&span, e);
        }
        metrics::record_upstream(Stage::Weather, &result);
        result
    }
}
