//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Provider / forward call:
//!     → timeouts.rs (shared client with connect and total deadlines)
//!     → on failure: mapped to the stage's internal error, never retried
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Inbound requests get an overall deadline in the server's middleware stack

pub mod timeouts;

pub use timeouts::upstream_client;
