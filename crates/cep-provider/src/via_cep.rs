//! ViaCEP, the second provider in the chain.
//!
//! Unknown codes come back as `200 OK` with `{"erro": true}` (older
//! deployments send the string `"true"`).

use async_trait::async_trait;
use cep_core::{AddressProvider, CepCode, LookupOutcome};
use serde_json::Value;

use crate::client::{is_blank, is_truthy, map_address, required_str, FieldMap, HttpClient};
use crate::config::ProviderConfig;
use crate::error::Result;

pub const PROVIDER_ID: &str = "VIA_CEP";
pub const DEFAULT_BASE_URL: &str = "https://viacep.com.br";

const FIELDS: FieldMap = FieldMap {
    state: "uf",
    city: "localidade",
    neighborhood: "bairro",
    street: "logradouro",
};

#[derive(Debug, Clone)]
pub struct ViaCepProvider {
    http: HttpClient,
}

impl ViaCepProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// Found means a non-empty `cep` and no `erro` flag.
    pub fn interpret(body: &Value) -> LookupOutcome {
        if is_blank(body) || is_truthy(body, "erro") || required_str(body, "cep").is_none() {
            return LookupOutcome::Miss;
        }
        map_address(body, &FIELDS)
    }
}

#[async_trait]
impl AddressProvider for ViaCepProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn lookup(&self, code: &CepCode) -> LookupOutcome {
        match self
            .http
            .get_json(PROVIDER_ID, &format!("/ws/{code}/json/"))
            .await
        {
            Ok(body) => Self::interpret(&body),
            Err(reason) => LookupOutcome::Unavailable(reason),
        }
    }
}
