//! Route handlers for both hops.
//!
//! Each handler picks up the request span once, at the boundary, and passes
//! it explicitly to the core operation it drives.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::Span;

use crate::error::{DomainError, DomainResult};
use crate::gateway::Forwarded;
use crate::http::request::X_REQUEST_ID;
use crate::http::server::{GatewayState, ResolverState};
use crate::observability::record_error;
use crate::resolve::WeatherEnvelope;

/// Body accepted by `POST /cep` and `/weather`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CepRequest {
    #[serde(default)]
    pub cep: String,
}

fn decode(span: &Span, body: &[u8]) -> DomainResult<CepRequest> {
    serde_json::from_slice(body).map_err(|e| {
        let err = DomainError::MalformedRequest(e.to_string());
        record_error(span, &err);
        err
    })
}

/// `POST /cep` on the gateway hop.
pub async fn submit_cep(
    State(state): State<GatewayState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Forwarded, DomainError> {
    let span = Span::current();
    let request = decode(&span, &body)?;
    state
        .forwarder
        .forward(&span, &request.cep, headers.get(&X_REQUEST_ID))
        .await
}

/// `GET /weather/{cep}` on the resolver hop.
pub async fn weather_by_path(
    State(state): State<ResolverState>,
    Path(cep): Path<String>,
) -> Result<Json<WeatherEnvelope>, DomainError> {
    let span = Span::current();
    state.resolver.resolve(&span, &cep).await.map(Json)
}

/// `GET|POST /weather` with a JSON body on the resolver hop.
pub async fn weather_by_body(
    State(state): State<ResolverState>,
    body: Bytes,
) -> Result<Json<WeatherEnvelope>, DomainError> {
    let span = Span::current();
    let request = decode(&span, &body)?;
    state.resolver.resolve(&span, &request.cep).await.map(Json)
}
