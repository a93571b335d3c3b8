//! Gateway hop: local shape check, then one forward to the resolver hop.
//!
//! # Design Decisions
//! - Malformed input is rejected here so it never costs a network round trip
//! - The resolver's status and body are passed through untouched
//! - Trace context and the request id travel as outbound headers

pub mod forwarder;

pub use forwarder::{Forwarded, Forwarder, WEATHER_PATH};
