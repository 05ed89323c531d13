//! BrasilAPI, the first provider in the chain.
//!
//! `GET {base}/api/cep/v1/{code}` answers unknown codes with `404` and an
//! error document (`{"name": "CepPromiseError", ...}`), which carries no
//! `cep` field and so reads as [`LookupOutcome::Miss`].

use async_trait::async_trait;
use cep_core::{AddressProvider, CepCode, LookupOutcome};
use serde_json::Value;

use crate::client::{is_blank, map_address, required_str, FieldMap, HttpClient};
use crate::config::ProviderConfig;
use crate::error::Result;

pub const PROVIDER_ID: &str = "BRASIL_API";
pub const DEFAULT_BASE_URL: &str = "https://brasilapi.com.br";

const FIELDS: FieldMap = FieldMap {
    state: "state",
    city: "city",
    neighborhood: "neighborhood",
    street: "street",
};

#[derive(Debug, Clone)]
pub struct BrasilApiProvider {
    http: HttpClient,
}

impl BrasilApiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// Maps a decoded response body to an outcome.
    ///
    /// A payload counts as found only when it carries a non-empty `cep`.
    pub fn interpret(body: &Value) -> LookupOutcome {
        if is_blank(body) || required_str(body, "cep").is_none() {
            return LookupOutcome::Miss;
        }
        map_address(body, &FIELDS)
    }
}

#[async_trait]
impl AddressProvider for BrasilApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn lookup(&self, code: &CepCode) -> LookupOutcome {
        match self
            .http
            .get_json(PROVIDER_ID, &format!("/api/cep/v1/{code}"))
            .await
        {
            Ok(body) => Self::interpret(&body),
            Err(reason) => LookupOutcome::Unavailable(reason),
        }
    }
}
