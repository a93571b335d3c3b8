//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! per-hop defaults (ServiceConfig::for_hop)
//!     → loader.rs (optional TOML file, then environment overrides)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → shared by value/Arc with handlers and clients
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow an empty environment
//! - Environment variables keep the names the deployed services already use
//!   (`PORT`, `SERVICE_B_URL`, `WEATHER_API_KEY`, `ZIPKIN_URL`)

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env_overrides, load_config, ConfigError};
pub use schema::{
    Hop, ListenerConfig, ObservabilityConfig, ServiceConfig, TimeoutConfig, UpstreamConfig,
    ValidationConfig,
};
pub use validation::{validate_config, ValidationError};
