//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML files.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cep::PostalCodeShape;

/// Default ViaCEP lookup template; `{cep}` is replaced by the postal code.
pub const DEFAULT_VIACEP_URL: &str = "https://viacep.com.br/ws/{cep}/json/";

/// Default WeatherAPI current-conditions endpoint.
pub const DEFAULT_WEATHER_API_URL: &str = "http://api.weatherapi.com/v1/current.json";

/// Default resolver hop base URL, as seen from the gateway.
pub const DEFAULT_SERVICE_B_URL: &str = "http://localhost:8081";

/// Default Zipkin collector base URL.
pub const DEFAULT_ZIPKIN_URL: &str = "http://localhost:9411";

/// Which service of the pipeline this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hop {
    /// Entry hop: validates and forwards (`POST /cep`).
    Gateway,
    /// Resolution hop: city and temperature lookup (`/weather`).
    Resolver,
}

impl Hop {
    pub fn as_str(self) -> &'static str {
        match self {
            Hop::Gateway => "gateway",
            Hop::Resolver => "resolver",
        }
    }

    /// Service name reported to the trace collector.
    pub fn service_name(self) -> &'static str {
        match self {
            Hop::Gateway => "service-a",
            Hop::Resolver => "service-b",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Hop::Gateway => 8080,
            Hop::Resolver => 8081,
        }
    }

    /// Value of `Access-Control-Allow-Methods` for this hop.
    pub fn allowed_methods(self) -> &'static str {
        match self {
            Hop::Gateway => "POST, OPTIONS",
            Hop::Resolver => "GET, POST, OPTIONS",
        }
    }
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration for one service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream service and provider endpoints.
    pub upstreams: UpstreamConfig,

    /// Postal code shape rule per hop.
    pub validation: ValidationConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    /// Defaults for `hop`; only the listen port differs between hops.
    pub fn for_hop(hop: Hop) -> Self {
        Self {
            listener: ListenerConfig::on_port(hop.default_port()),
            ..Self::default()
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl ListenerConfig {
    pub fn on_port(port: u16) -> Self {
        Self {
            bind_address: format!("0.0.0.0:{port}"),
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self::on_port(Hop::Gateway.default_port())
    }
}

/// Endpoints the services call out to.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the resolver hop (gateway only).
    pub service_b_url: String,

    /// ViaCEP lookup URL template containing `{cep}`.
    pub viacep_url: String,

    /// WeatherAPI current-conditions endpoint.
    pub weather_api_url: String,

    /// WeatherAPI key. The resolver starts without it but every weather
    /// lookup then fails as misconfigured.
    pub weather_api_key: Option<String>,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` for outbound calls.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            service_b_url: DEFAULT_SERVICE_B_URL.to_string(),
            viacep_url: DEFAULT_VIACEP_URL.to_string(),
            weather_api_url: DEFAULT_WEATHER_API_URL.to_string(),
            weather_api_key: None,
            system_proxy: true,
        }
    }
}

/// Postal code shape rule applied by each hop.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ValidationConfig {
    pub gateway_shape: PostalCodeShape,
    pub resolver_shape: PostalCodeShape,
}

impl ValidationConfig {
    pub fn shape_for(&self, hop: Hop) -> PostalCodeShape {
        match hop {
            Hop::Gateway => self.gateway_shape,
            Hop::Resolver => self.resolver_shape,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            gateway_shape: PostalCodeShape::Strict,
            resolver_shape: PostalCodeShape::LengthOnly,
        }
    }
}

/// Timeout configuration for inbound and outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Outbound connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time for one outbound call in seconds.
    pub upstream_secs: u64,

    /// Total time for one inbound request in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 10,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Service name override for exported spans.
    pub service_name: Option<String>,

    /// Export spans to Zipkin.
    pub tracing_enabled: bool,

    /// Zipkin collector base URL (spans go to `/api/v2/spans`).
    pub zipkin_url: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            service_name: None,
            tracing_enabled: true,
            zipkin_url: DEFAULT_ZIPKIN_URL.to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hop_defaults() {
        let gateway = ServiceConfig::for_hop(Hop::Gateway);
        assert_eq!(gateway.listener.bind_address, "0.0.0.0:8080");

        let resolver = ServiceConfig::for_hop(Hop::Resolver);
        assert_eq!(resolver.listener.bind_address, "0.0.0.0:8081");
        assert_eq!(resolver.upstreams.service_b_url, "http://localhost:8081");
        assert!(resolver.upstreams.weather_api_key.is_none());
    }

    #[test]
    fn test_shape_per_hop() {
        let validation = ValidationConfig::default();
        assert_eq!(validation.shape_for(Hop::Gateway), PostalCodeShape::Strict);
        assert_eq!(validation.shape_for(Hop::Resolver), PostalCodeShape::LengthOnly);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ServiceConfig = toml::from_str(
            r#"
            [upstreams]
            weather_api_key = "secret"

            [validation]
            resolver_shape = "strict"
            "#,
        )
        .unwrap();
        assert_eq!(config.upstreams.weather_api_key.as_deref(), Some("secret"));
        assert_eq!(config.upstreams.viacep_url, DEFAULT_VIACEP_URL);
        assert_eq!(config.validation.resolver_shape, PostalCodeShape::Strict);
        assert_eq!(config.validation.gateway_shape, PostalCodeShape::Strict);
        assert_eq!(config.timeouts.upstream_secs, 10);
    }
}
