//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{Hop, ListenerConfig, ServiceConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to encode defaults: {0}")]
    Defaults(#[from] toml::ser::Error),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration for `hop`: defaults, then the optional TOML file at
/// `path`, then environment variables. The result is validated.
pub fn load_config(path: Option<&Path>, hop: Hop) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            parse_config(&content, hop)?
        }
        None => ServiceConfig::for_hop(hop),
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML document on top of the defaults for `hop`.
///
/// Keys missing from the document keep the per-hop default, including the
/// listen port.
pub fn parse_config(content: &str, hop: Hop) -> Result<ServiceConfig, ConfigError> {
    let overlay: toml::Value = toml::from_str(content).map_err(ConfigError::Parse)?;
    let mut merged =
        toml::Value::try_from(ServiceConfig::for_hop(hop)).map_err(ConfigError::Defaults)?;
    merge(&mut merged, overlay);
    merged.try_into().map_err(ConfigError::Parse)
}

fn merge(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Apply the recognized environment variables to `config`.
///
/// Unset and blank variables are ignored. `lookup` is `std::env::var` in
/// production and a map in tests.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(raw) = var("PORT") {
        let port: u16 = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            key: "PORT",
            value: raw.clone(),
        })?;
        config.listener = ListenerConfig::on_port(port);
    }
    if let Some(url) = var("SERVICE_B_URL") {
        config.upstreams.service_b_url = url;
    }
    if let Some(key) = var("WEATHER_API_KEY") {
        config.upstreams.weather_api_key = Some(key);
    }
    if let Some(url) = var("VIACEP_URL") {
        config.upstreams.viacep_url = url;
    }
    if let Some(url) = var("WEATHER_API_URL") {
        config.upstreams.weather_api_url = url;
    }
    if let Some(url) = var("ZIPKIN_URL") {
        config.observability.zipkin_url = url;
    }
    if let Some(name) = var("SERVICE_NAME") {
        config.observability.service_name = Some(name);
    }

    Ok(())
}
