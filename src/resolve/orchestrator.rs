//! Postal code → city → temperature sequencing.

use std::sync::Arc;

use tracing::{field::Empty, Span};

use crate::cep::{PostalCode, PostalCodeShape};
use crate::error::{DomainError, DomainResult, Stage};
use crate::observability::record_error;
use crate::providers::{LocationProvider, TemperatureProvider};
use crate::resolve::envelope::WeatherEnvelope;

/// Drives one resolution: shape check, city lookup, temperature lookup.
#[derive(Clone)]
pub struct WeatherResolver {
    location: Arc<dyn LocationProvider>,
    temperature: Arc<dyn TemperatureProvider>,
    shape: PostalCodeShape,
}

impl WeatherResolver {
    pub fn new(
        location: Arc<dyn LocationProvider>,
        temperature: Arc<dyn TemperatureProvider>,
        shape: PostalCodeShape,
    ) -> Self {
        Self {
            location,
            temperature,
            shape,
        }
    }

    pub fn shape(&self) -> PostalCodeShape {
        self.shape
    }

    /// Resolve `raw` into a full envelope, or the first error encountered.
    ///
    /// Location misses stay [`DomainError::NotFound`]; any other provider
    /// failure is attributed to the stage that produced it, so the caller
    /// sees the matching generic message.
    pub async fn resolve(&self, parent: &Span, raw: &str) -> DomainResult<WeatherEnvelope> {
        let span = tracing::info_span!(
            parent: parent,
            "weather.resolve",
            cep = %raw,
            shape = %self.shape,
            http.status_code = Empty,
            otel.status_code = Empty,
            error.message = Empty,
        );

        let result = self.run(&span, raw).await;
        match &result {
            Ok(_) => {
                span.record("http.status_code", 200u16);
            }
            Err(e) => {
                span.record("http.status_code", e.status().as_u16());
                record_error(&span, e);
            }
        }
        result
    }

    async fn run(&self, span: &Span, raw: &str) -> DomainResult<WeatherEnvelope> {
        let code = PostalCode::parse(raw, self.shape)?;

        let city = self
            .location
            .resolve_city(span, &code)
            .await
            .map_err(|e| match e {
                DomainError::NotFound => DomainError::NotFound,
                other => other.into_internal(Stage::Location),
            })?;

        let celsius = self
            .temperature
            .resolve_temperature(span, &city)
            .await
            .map_err(|e| e.into_internal(Stage::Weather))?;

        Ok(WeatherEnvelope::from_celsius(Some(city), celsius))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FixedCity {
        reply: fn() -> DomainResult<String>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl LocationProvider for FixedCity {
        async fn resolve_city(&self, _parent: &Span, _code: &PostalCode) -> DomainResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    struct FixedTemperature {
        reply: fn() -> DomainResult<f64>,
        calls: AtomicU32,
    }

    #[async_trait]
    impl TemperatureProvider for FixedTemperature {
        async fn resolve_temperature(&self, _parent: &Span, _city: &str) -> DomainResult<f64> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    fn resolver(
        city: fn() -> DomainResult<String>,
        temp: fn() -> DomainResult<f64>,
    ) -> (WeatherResolver, Arc<FixedCity>, Arc<FixedTemperature>) {
        let location = Arc::new(FixedCity {
            reply: city,
            calls: AtomicU32::new(0),
        });
        let temperature = Arc::new(FixedTemperature {
            reply: temp,
            calls: AtomicU32::new(0),
        });
        let resolver = WeatherResolver::new(
            location.clone(),
            temperature.clone(),
            PostalCodeShape::LengthOnly,
        );
        (resolver, location, temperature)
    }

    #[tokio::test]
    async fn test_success_builds_full_envelope() {
        let (resolver, _, _) = resolver(|| Ok("São Paulo".into()), || Ok(20.5));
        let envelope = resolver.resolve(&Span::none(), "01001000").await.unwrap();
        assert_eq!(envelope.city.as_deref(), Some("São Paulo"));
        assert_eq!(envelope.temp_c, 20.5);
        assert_eq!(envelope.temp_f, 68.9);
        assert_eq!(envelope.temp_k, 293.5);
    }

    #[tokio::test]
    async fn test_invalid_shape_skips_providers() {
        let (resolver, location, temperature) = resolver(|| Ok("Recife".into()), || Ok(30.0));
        let err = resolver.resolve(&Span::none(), "123").await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput));
        assert_eq!(location.calls.load(Ordering::SeqCst), 0);
        assert_eq!(temperature.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_not_found_short_circuits() {
        let (resolver, _, temperature) = resolver(|| Err(DomainError::NotFound), || Ok(30.0));
        let err = resolver.resolve(&Span::none(), "00000000").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
        assert_eq!(err.status().as_u16(), 404);
        assert_eq!(temperature.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_location_failure_is_city_error() {
        let (resolver, _, _) = resolver(
            || Err(DomainError::upstream(Stage::Location, "connection refused")),
            || Ok(30.0),
        );
        let err = resolver.resolve(&Span::none(), "01001000").await.unwrap_err();
        assert_eq!(err.status().as_u16(), 500);
        assert_eq!(err.public_message(), "error getting city information");
    }

    #[tokio::test]
    async fn test_missing_credential_is_weather_error() {
        let (resolver, _, _) = resolver(
            || Ok("Recife".into()),
            || {
                Err(DomainError::Misconfigured {
                    stage: Stage::Weather,
                    reason: "weather API key not configured",
                })
            },
        );
        let err = resolver.resolve(&Span::none(), "50000000").await.unwrap_err();
        assert_eq!(err.status().as_u16(), 500);
        assert_eq!(err.public_message(), "error getting weather information");
    }

    #[tokio::test]
    async fn test_weather_not_found_is_still_internal() {
        let (resolver, _, _) = resolver(|| Ok("Recife".into()), || Err(DomainError::NotFound));
        let err = resolver.resolve(&Span::none(), "50000000").await.unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Weather));
        assert_eq!(err.status().as_u16(), 500);
    }
}
