//! Timeout enforcement for outbound calls.
//!
//! # Responsibilities
//! - Build the shared HTTP client with connect and total timeouts
//! - Keep every provider and forward call bounded
//!
//! # Design Decisions
//! - Timeouts live on the client, so a timed-out call is just another
//!   transport error and maps to the stage's internal failure
//! - No retries: every failure is final for the request

use std::time::Duration;

use crate::config::TimeoutConfig;

/// Build the outbound client shared by a hop's providers.
pub fn upstream_client(
    timeouts: &TimeoutConfig,
    system_proxy: bool,
) -> Result<reqwest::Client, reqwest::Error> {
    let builder = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.upstream_secs))
        .user_agent(concat!("cep-weather/", env!("CARGO_PKG_VERSION")));

    if system_proxy {
        builder.build()
    } else {
        builder.no_proxy().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_with_defaults() {
        assert!(upstream_client(&TimeoutConfig::default(), true).is_ok());
        assert!(upstream_client(&TimeoutConfig::default(), false).is_ok());
    }
}
