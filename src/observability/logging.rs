//! Structured logging and subscriber installation.
//!
//! # Responsibilities
//! - Install the global `tracing` subscriber
//! - Bridge spans to OpenTelemetry when export is enabled
//! - Install the W3C propagator used by both hops
//!
//! # Design Decisions
//! - `RUST_LOG` wins over the configured level
//! - Human-readable fmt output; span export goes to Zipkin

use opentelemetry::{global, trace::TracerProvider as _};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Hop, ObservabilityConfig};
use crate::observability::telemetry::{build_tracer_provider, Telemetry, TelemetryError};

/// Default filter directives for a configured level.
pub fn default_directives(log_level: &str) -> String {
    format!("cep_weather={log_level},tower_http={log_level}")
}

/// Install logging and, if enabled, span export for `hop`.
///
/// Must run before the Tokio runtime is started; see
/// [`build_tracer_provider`].
pub fn init(config: &ObservabilityConfig, hop: Hop) -> Result<Telemetry, TelemetryError> {
    global::set_text_map_propagator(TraceContextPropagator::new());

    let service_name = config
        .service_name
        .clone()
        .unwrap_or_else(|| hop.service_name().to_owned());

    let provider = if config.tracing_enabled {
        Some(build_tracer_provider(&service_name, &config.zipkin_url)?)
    } else {
        None
    };

    let otel_layer = provider
        .as_ref()
        .map(|p| tracing_opentelemetry::layer().with_tracer(p.tracer(service_name.clone())));

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(&config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(otel_layer)
        .try_init()?;

    tracing::info!(
        service = %service_name,
        tracing_enabled = config.tracing_enabled,
        zipkin_url = %config.zipkin_url,
        "Telemetry initialized"
    );

    Ok(Telemetry::new(provider))
}
