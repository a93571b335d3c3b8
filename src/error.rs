//! Domain error taxonomy and its HTTP mapping.
//!
//! Every failure the pipeline can produce is one of the [`DomainError`] kinds
//! below. Handlers never build status/message pairs themselves: they hand the
//! error to [`DomainError::status`] and [`DomainError::public_message`] (or
//! simply return it, see the `IntoResponse` impl in `http::response`), so the
//! caller only ever sees one of a handful of fixed messages. The underlying
//! cause stays in the `Display` output, which goes to spans and logs.

use std::fmt;

use axum::http::StatusCode;
use thiserror::Error;

/// Pipeline step that produced an internal failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Postal code to city lookup.
    Location,
    /// City to temperature lookup.
    Weather,
    /// Gateway to resolver hop.
    Forward,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Location => "location",
            Stage::Weather => "weather",
            Stage::Forward => "forward",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while resolving or forwarding a postal code.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The postal code failed the shape check.
    #[error("invalid zipcode")]
    InvalidInput,

    /// The request body could not be decoded.
    #[error("malformed request body: {0}")]
    MalformedRequest(String),

    /// The lookup provider has no match for the postal code.
    #[error("can not find zipcode")]
    NotFound,

    /// Transport error or non-success response from an upstream.
    #[error("{stage} upstream failure: {reason}")]
    UpstreamFailure { stage: Stage, reason: String },

    /// A required setting (such as a provider credential) is missing.
    #[error("{stage} misconfigured: {reason}")]
    Misconfigured { stage: Stage, reason: &'static str },
}

/// Result type for pipeline operations.
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    pub fn upstream(stage: Stage, reason: impl fmt::Display) -> Self {
        DomainError::UpstreamFailure {
            stage,
            reason: reason.to_string(),
        }
    }

    /// Collapse any error into an internal failure attributed to `stage`.
    pub fn into_internal(self, stage: Stage) -> Self {
        match self {
            DomainError::Misconfigured { reason, .. } => {
                DomainError::Misconfigured { stage, reason }
            }
            DomainError::UpstreamFailure { reason, .. } => {
                DomainError::UpstreamFailure { stage, reason }
            }
            other => DomainError::UpstreamFailure {
                stage,
                reason: other.to_string(),
            },
        }
    }

    /// Pipeline step responsible for an internal failure, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            DomainError::UpstreamFailure { stage, .. }
            | DomainError::Misconfigured { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// HTTP status presented to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            DomainError::InvalidInput => StatusCode::UNPROCESSABLE_ENTITY,
            DomainError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            DomainError::NotFound => StatusCode::NOT_FOUND,
            DomainError::UpstreamFailure { .. } | DomainError::Misconfigured { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message presented to the caller. Never includes provider detail.
    pub fn public_message(&self) -> &'static str {
        match self {
            DomainError::InvalidInput => "invalid zipcode",
            DomainError::MalformedRequest(_) => "invalid request format",
            DomainError::NotFound => "can not find zipcode",
            DomainError::UpstreamFailure { stage, .. }
            | DomainError::Misconfigured { stage, .. } => {
                match stage {
                    Stage::Location => "error getting city information",
                    Stage::Weather => "error getting weather information",
                    Stage::Forward => "error forwarding to service B",
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors_map_to_fixed_pairs() {
        let cases = [
            (DomainError::InvalidInput, 422, "invalid zipcode"),
            (DomainError::MalformedRequest("eof".into()), 400, "invalid request format"),
            (DomainError::NotFound, 404, "can not find zipcode"),
        ];
        for (err, status, message) in cases {
            assert_eq!(err.status().as_u16(), status);
            assert_eq!(err.public_message(), message);
        }
    }

    #[test]
    fn test_internal_errors_are_keyed_by_stage() {
        let city = DomainError::upstream(Stage::Location, "connection refused");
        assert_eq!(city.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(city.public_message(), "error getting city information");

        let weather = DomainError::Misconfigured {
            stage: Stage::Weather,
            reason: "weather API key not configured",
        };
        assert_eq!(weather.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(weather.public_message(), "error getting weather information");

        let forward = DomainError::upstream(Stage::Forward, "timed out");
        assert_eq!(forward.public_message(), "error forwarding to service B");
    }

    #[test]
    fn test_public_message_hides_cause() {
        let err = DomainError::upstream(Stage::Weather, "status 401: API key is invalid");
        assert!(!err.public_message().contains("401"));
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_into_internal_restages() {
        let err = DomainError::NotFound.into_internal(Stage::Weather);
        assert_eq!(err.stage(), Some(Stage::Weather));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let err = DomainError::Misconfigured {
            stage: Stage::Location,
            reason: "missing",
        }
        .into_internal(Stage::Weather);
        assert!(matches!(
            err,
            DomainError::Misconfigured {
                stage: Stage::Weather,
                reason: "missing"
            }
        ));
    }
}
