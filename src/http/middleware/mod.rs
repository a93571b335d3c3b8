//! Middleware applied to both hops.

pub mod cors;
pub mod metrics;

pub use cors::cors;
pub use metrics::track_requests;
