//! Resolution hop core.
//!
//! # Data Flow
//! ```text
//! raw postal code
//!     → shape check (PostalCode::parse)
//!     → LocationProvider::resolve_city
//!     → TemperatureProvider::resolve_temperature
//!     → envelope.rs (derive °F and K from °C)
//! ```
//!
//! # Design Decisions
//! - Short-circuits on the first failure; no partial envelope is ever built
//! - Location misses stay `NotFound`; everything else becomes an internal
//!   failure of the stage that produced it

pub mod envelope;
pub mod orchestrator;

pub use envelope::{celsius_to_fahrenheit, celsius_to_kelvin, WeatherEnvelope};
pub use orchestrator::WeatherResolver;
