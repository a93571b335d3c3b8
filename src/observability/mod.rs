//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request:
//!     → propagation.rs (continue upstream trace context into the request span)
//!     → handlers pass the span explicitly down the call chain
//!     → provider / forward calls open child spans
//!     → propagation.rs (inject trace context into the outbound request)
//!
//! Export:
//!     → logging.rs (fmt layer, env filter)
//!     → telemetry.rs (OpenTelemetry bridge, Zipkin exporter)
//!     → metrics.rs (Prometheus scrape endpoint)
//! ```
//!
//! # Design Decisions
//! - W3C Trace Context headers between hops
//! - Callers see generic messages; spans carry the real cause
//! - Metrics are optional and off by default

pub mod logging;
pub mod metrics;
pub mod propagation;
pub mod telemetry;

pub use logging::init;
pub use propagation::{continue_trace, inject_span_context, record_error};
pub use telemetry::{Telemetry, TelemetryError};
