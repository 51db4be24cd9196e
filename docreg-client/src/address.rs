//! Postal-code (CEP) address lookup

use std::time::Duration;

use async_trait::async_trait;
use docreg_forms::address::AddressFields;
use docreg_forms::validation::digits_only;
use docreg_forms::validation::is_valid_cep;
use reqwest::Client;
use serde::Deserialize;

use crate::ClientConfig;
use crate::client::request_error;
use crate::error::ApiError;

/// Resolves a CEP to street, neighborhood, city, and state.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    /// Returns `Ok(None)` when the service knows no such CEP.
    ///
    /// A CEP that is not 8 digits after stripping punctuation is rejected
    /// with [`ApiError::InvalidCep`] before any request is made.
    async fn lookup(&self, cep: &str) -> Result<Option<AddressFields>, ApiError>;
}

/// [`AddressLookup`] backed by the public ViaCEP service.
#[derive(Debug, Clone)]
pub struct ViaCepClient {
    base_url: String,
    http_client: Client,
    timeout: Option<Duration>,
}

impl ViaCepClient {
    pub fn new() -> Self {
        Self::with_base_url(ClientConfig::default().viacep_url)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client: Client::new(),
            timeout: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_base_url(config.viacep_url.clone()).timeout(config.timeout)
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// `{base}/{cep}/json/` for an already-validated CEP.
    fn lookup_url(&self, cep: &str) -> String {
        format!("{}/{}/json/", self.base_url.trim_end_matches('/'), cep)
    }
}

impl Default for ViaCepClient {
    fn default() -> Self {
        Self::new()
    }
}

/// ViaCEP body; `erro` is set (as `true` or `"true"`) for unknown CEPs.
#[derive(Debug, Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepResponse {
    fn into_fields(self) -> Option<AddressFields> {
        let not_found = match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag == "true",
            _ => false,
        };
        (!not_found).then(|| AddressFields {
            street: self.logradouro,
            neighborhood: self.bairro,
            city: self.localidade,
            state: self.uf,
        })
    }
}

#[async_trait]
impl AddressLookup for ViaCepClient {
    async fn lookup(&self, cep: &str) -> Result<Option<AddressFields>, ApiError> {
        let digits = digits_only(cep);
        if !is_valid_cep(&digits) {
            return Err(ApiError::InvalidCep(cep.to_string()));
        }

        let url = self.lookup_url(&digits);
        log::debug!("[viacep] GET {}", url);

        let mut request = self.http_client.get(&url);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        let response = request
            .send()
            .await
            .map_err(|e| request_error(e, self.timeout))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| request_error(e, self.timeout))?;

        // ViaCEP answers 400 for malformed CEPs; treat it like a miss.
        if status == 400 {
            return Ok(None);
        }
        if !(200..300).contains(&status) {
            return Err(ApiError::from_response(status, &body));
        }

        let parsed: ViaCepResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body.clone()))?;
        Ok(parsed.into_fields())
    }
}
