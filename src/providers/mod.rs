//! Upstream data providers.
//!
//! # Data Flow
//! ```text
//! PostalCode
//!     → location.rs (ViaCEP: postal code → city)
//!     → weather.rs (WeatherAPI: city → Celsius)
//! ```
//!
//! # Design Decisions
//! - Each provider sits behind a trait so the resolver can be driven by fakes
//! - Base URLs are constructor arguments, never globals
//! - Every call takes the caller's span and opens a child span for itself
//! - Provider errors are already `DomainError`s tagged with their stage

pub mod location;
pub mod weather;

use async_trait::async_trait;
use tracing::Span;

use crate::cep::PostalCode;
use crate::error::DomainResult;

pub use location::ViaCepClient;
pub use weather::WeatherApiClient;

/// Resolves a postal code to a place name.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Returns `DomainError::NotFound` when the provider has no match.
    async fn resolve_city(&self, parent: &Span, code: &PostalCode) -> DomainResult<String>;
}

/// Resolves a place name to its current temperature in Celsius.
#[async_trait]
pub trait TemperatureProvider: Send + Sync {
    async fn resolve_temperature(&self, parent: &Span, city: &str) -> DomainResult<f64>;
}
