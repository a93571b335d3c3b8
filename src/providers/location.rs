//! ViaCEP postal code lookup.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer};
use tracing::{field::Empty, Instrument, Span};

use crate::cep::PostalCode;
use crate::error::{DomainError, DomainResult, Stage};
use crate::observability::{metrics, record_error};
use crate::providers::LocationProvider;

/// Placeholder replaced by the postal code in the lookup URL template.
pub const CEP_PLACEHOLDER: &str = "{cep}";

/// ViaCEP response; only the fields the pipeline reads.
#[derive(Debug, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    localidade: String,
    #[serde(default, deserialize_with = "not_found_flag")]
    erro: bool,
}

/// ViaCEP reports a miss as `"erro": true` or `"erro": "true"`.
fn not_found_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(flag) => flag,
        Flag::Text(text) => text.eq_ignore_ascii_case("true"),
    })
}

/// Client for the ViaCEP lookup service.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    http: reqwest::Client,
    url_template: String,
}

impl ViaCepClient {
    /// `url_template` must contain `{cep}`, e.g. `https://viacep.com.br/ws/{cep}/json/`.
    pub fn new(http: reqwest::Client, url_template: impl Into<String>) -> Self {
        Self {
            http,
            url_template: url_template.into(),
        }
    }

    pub fn lookup_url(&self, code: &PostalCode) -> String {
        self.url_template.replace(CEP_PLACEHOLDER, code.as_str())
    }

    async fn lookup(&self, span: &Span, url: &str) -> DomainResult<String> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| {
                DomainError::upstream(Stage::Location, format!("failed to get CEP info: {e}"))
            })?;

        let status = response.status();
        span.record("http.status_code", status.as_u16());
        if status != StatusCode::OK {
            return Err(DomainError::upstream(
                Stage::Location,
                format!("viacep returned status {status}"),
            ));
        }

        let payload: ViaCepPayload = response.json().await.map_err(|e| {
            DomainError::upstream(Stage::Location, format!("failed to decode response: {e}"))
        })?;

        if payload.erro {
            span.record("cep.not_found", true);
            return Err(DomainError::NotFound);
        }
        if payload.localidade.trim().is_empty() {
            return Err(DomainError::upstream(Stage::Location, "empty localidade"));
        }

        span.record("city", payload.localidade.as_str());
        Ok(payload.localidade)
    }
}

#[async_trait]
impl LocationProvider for ViaCepClient {
    async fn resolve_city(&self, parent: &Span, code: &PostalCode) -> DomainResult<String> {
        let url = self.lookup_url(code);
        let span = tracing::info_span!(
            parent: parent,
            "viacep.lookup",
            otel.kind = "client",
            cep = %code,
            viacep.url = %url,
            http.status_code = Empty,
            cep.not_found = Empty,
            city = Empty,
            otel.status_code = Empty,
            error.message = Empty,
        );

        let result = self.lookup(&span, &url).instrument(span.clone()).await;
        if let Err(e) = &result {
            record_error(&span, e);
        }
        metrics::record_upstream(Stage::Location, &result);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cep::PostalCodeShape;

    #[test]
    fn test_lookup_url_substitutes_code() {
        let client =
            ViaCepClient::new(reqwest::Client::new(), "https://viacep.com.br/ws/{cep}/json/");
        let code = PostalCode::parse("01001000", PostalCodeShape::Strict).unwrap();
        assert_eq!(client.lookup_url(&code), "https://viacep.com.br/ws/01001000/json/");
    }

    #[test]
    fn test_payload_found() {
        let payload: ViaCepPayload = serde_json::from_str(
            r#"{"cep":"01001-000","logradouro":"Praça da Sé","localidade":"São Paulo","uf":"SP"}"#,
        )
        .unwrap();
        assert!(!payload.erro);
        assert_eq!(payload.localidade, "São Paulo");
    }

    #[test]
    fn test_payload_not_found_flag_forms() {
        for body in [r#"{"erro":true}"#, r#"{"erro":"true"}"#] {
            let payload: ViaCepPayload = serde_json::from_str(body).unwrap();
            assert!(payload.erro, "{body} should be a miss");
        }
        let payload: ViaCepPayload =
            serde_json::from_str(r#"{"erro":false,"localidade":"Recife"}"#).unwrap();
        assert!(!payload.erro);
    }

    #[test]
    fn test_payload_without_city_decodes_empty() {
        let payload: ViaCepPayload = serde_json::from_str(r#"{"cep":"01001-000"}"#).unwrap();
        assert!(!payload.erro);
        assert!(payload.localidade.is_empty());
    }
}
