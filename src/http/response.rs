//! Response encoding.
//!
//! # Responsibilities
//! - Encode every failure as `{"message": ...}` with its mapped status
//! - Pass forwarded resolver responses through unchanged
//!
//! # Design Decisions
//! - Status and message come only from `DomainError::status` and
//!   `DomainError::public_message`; handlers never pick them
//! - Unknown paths get an empty 404, like the services this replaces

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::gateway::Forwarded;

/// Message for a method the route does not serve.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "method not allowed";

/// Error envelope returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            message: message.to_owned(),
        }),
    )
        .into_response()
}

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.public_message())
    }
}

impl IntoResponse for Forwarded {
    fn into_response(self) -> Response {
        let content_type = self
            .content_type
            .unwrap_or_else(|| HeaderValue::from_static("application/json"));
        (self.status, [(CONTENT_TYPE, content_type)], self.body).into_response()
    }
}

pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE)
}

pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
