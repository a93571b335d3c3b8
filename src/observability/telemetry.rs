//! OpenTelemetry export to Zipkin.

use opentelemetry::global;
use opentelemetry_sdk::{trace::SdkTracerProvider, Resource};
use opentelemetry_zipkin::ZipkinExporter;
use thiserror::Error;

/// Errors raised while installing telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    #[error("failed to build zipkin exporter: {0}")]
    Exporter(String),

    #[error("failed to install tracing subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Zipkin v2 span ingestion endpoint for a collector base URL.
pub fn zipkin_endpoint(base: &str) -> String {
    format!("{}/api/v2/spans", base.trim_end_matches('/'))
}

/// Build a tracer provider that batches spans to the Zipkin collector.
///
/// The exporter uses a blocking HTTP client on the batch processor's own
/// thread, so this must be called outside the async runtime.
pub fn build_tracer_provider(
    service_name: &str,
    zipkin_url: &str,
) -> Result<SdkTracerProvider, TelemetryError> {
    let exporter = ZipkinExporter::builder()
        .with_collector_endpoint(zipkin_endpoint(zipkin_url))
        .build()
        .map_err(|e| TelemetryError::Exporter(e.to_string()))?;

    let resource = Resource::builder()
        .with_service_name(service_name.to_owned())
        .build();

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(resource)
        .build())
}

/// Handle on installed telemetry; flushes pending spans on shutdown.
#[derive(Debug, Default)]
pub struct Telemetry {
    provider: Option<SdkTracerProvider>,
}

impl Telemetry {
    pub(crate) fn new(provider: Option<SdkTracerProvider>) -> Self {
        if let Some(provider) = &provider {
            global::set_tracer_provider(provider.clone());
        }
        Self { provider }
    }

    /// Whether spans are exported.
    pub fn is_exporting(&self) -> bool {
        self.provider.is_some()
    }

    /// Flush and stop the exporter. Call after the runtime has stopped.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                tracing::warn!(error = %e, "Error shutting down tracer provider");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zipkin_endpoint() {
        assert_eq!(
            zipkin_endpoint("http://localhost:9411"),
            "http://localhost:9411/api/v2/spans"
        );
        assert_eq!(
            zipkin_endpoint("http://zipkin:9411/"),
            "http://zipkin:9411/api/v2/spans"
        );
    }

    #[test]
    fn test_disabled_telemetry_is_not_exporting() {
        let telemetry = Telemetry::default();
        assert!(!telemetry.is_exporting());
        telemetry.shutdown();
    }
}
