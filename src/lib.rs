//! CEP weather pipeline library.
//!
//! Two hops share this crate: the gateway (`POST /cep`) validates a postal
//! code and forwards it, and the resolver (`/weather`) turns it into a city
//! and a temperature in three scales.

// Core pipeline
pub mod cep;
pub mod error;
pub mod gateway;
pub mod providers;
pub mod resolve;

// Transport
pub mod http;

// Cross-cutting concerns
pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod resilience;

pub use config::{Hop, ServiceConfig};
pub use error::{DomainError, DomainResult, Stage};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
