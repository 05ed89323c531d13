//! AwesomeAPI, the last provider in the chain.
//!
//! Unknown codes come back as `404` with `{"code": "not_found", "message":
//! ...}`, and some lookups return a bare `null`.

use async_trait::async_trait;
use cep_core::{AddressProvider, CepCode, LookupOutcome};
use serde_json::Value;

use crate::client::{is_blank, is_truthy, map_address, required_str, FieldMap, HttpClient};
use crate::config::ProviderConfig;
use crate::error::Result;

pub const PROVIDER_ID: &str = "AWESOME_API";
pub const DEFAULT_BASE_URL: &str = "https://cep.awesomeapi.com.br";

const FIELDS: FieldMap = FieldMap {
    state: "state",
    city: "city",
    neighborhood: "district",
    street: "address",
};

#[derive(Debug, Clone)]
pub struct AwesomeApiProvider {
    http: HttpClient,
}

impl AwesomeApiProvider {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    /// Found means a non-null body with no error `code` and a non-empty `cep`.
    pub fn interpret(body: &Value) -> LookupOutcome {
        if is_blank(body) || is_truthy(body, "code") || required_str(body, "cep").is_none() {
            return LookupOutcome::Miss;
        }
        map_address(body, &FIELDS)
    }
}

#[async_trait]
impl AddressProvider for AwesomeApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn lookup(&self, code: &CepCode) -> LookupOutcome {
        match self.http.get_json(PROVIDER_ID, &format!("/json/{code}")).await {
            Ok(body) => Self::interpret(&body),
            Err(reason) => LookupOutcome::Unavailable(reason),
        }
    }
}
