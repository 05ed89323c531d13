use std::time::Duration;

use cep_core::{LookupOutcome, ResolvedAddress};
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};

/// The reqwest plumbing shared by every provider: one client, one base URL
/// and a per-request timeout.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpClient {
    pub(crate) fn new(config: ProviderConfig) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| ProviderError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout,
        })
    }

    /// GETs `{base_url}{path}` and decodes the body as JSON.
    ///
    /// Bodies of `2xx` and most `4xx` responses are decoded; an empty body
    /// decodes to [`Value::Null`]. Transport failures, `5xx`, `408`, `429`
    /// and undecodable bodies come back as `Err` with a human-readable
    /// reason.
    pub(crate) async fn get_json(
        &self,
        provider: &'static str,
        path: &str,
    ) -> std::result::Result<Value, String> {
        let url = format!("{}{}", self.base_url, path);
        debug!(provider, %url, "provider request");

        let response = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    format!("request timed out after {:?}", self.timeout)
                } else {
                    format!("request failed: {e}")
                }
            })?;

        let status = response.status();
        if !answers_with_body(status) {
            return Err(format!("unexpected status {status}"));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read body: {e}"))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| format!("undecodable body (status {status}): {e}"))
    }
}

/// Success and client-error responses carry a document worth reading:
/// unknown codes come back as `404` with an error body. Throttling, request
/// timeouts and server errors do not.
fn answers_with_body(status: StatusCode) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS || status == StatusCode::REQUEST_TIMEOUT {
        return false;
    }
    status.is_success() || status.is_client_error()
}

/// Reads an optional string field, treating absence and `null` as empty.
pub(crate) fn optional_str(body: &Value, field: &str) -> String {
    body.get(field)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Reads a field that must be a non-empty string in a successful payload.
pub(crate) fn required_str(body: &Value, field: &str) -> Option<String> {
    body.get(field)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// `true` when `field` carries something other than `null`, `false`, `""`
/// or an empty container.
pub(crate) fn is_truthy(body: &Value, field: &str) -> bool {
    match body.get(field) {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => !s.is_empty() && s != "0" && s != "false",
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
    }
}

/// `true` for `null`, `{}` and `[]`.
pub(crate) fn is_blank(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(fields) => fields.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Where a provider keeps the four common address fields.
pub(crate) struct FieldMap {
    pub state: &'static str,
    pub city: &'static str,
    pub neighborhood: &'static str,
    pub street: &'static str,
}

/// Maps a payload already known to describe a found code.
///
/// `state` and `city` must be present; a payload without them is treated as
/// broken rather than as a match.
pub(crate) fn map_address(body: &Value, fields: &FieldMap) -> LookupOutcome {
    let Some(state) = required_str(body, fields.state) else {
        return LookupOutcome::Unavailable(format!("payload has no '{}'", fields.state));
    };
    let Some(city) = required_str(body, fields.city) else {
        return LookupOutcome::Unavailable(format!("payload has no '{}'", fields.city));
    };

    LookupOutcome::Resolved(ResolvedAddress {
        state,
        city,
        neighborhood: optional_str(body, fields.neighborhood),
        street: optional_str(body, fields.street),
    })
}
