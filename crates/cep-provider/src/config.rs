use serde::Deserialize;
use std::time::Duration;
use typed_builder::TypedBuilder;

use crate::awesome_api;
use crate::brasil_api;
use crate::via_cep;

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Connection settings for one provider endpoint.
#[derive(Debug, Clone, TypedBuilder, Deserialize)]
pub struct ProviderConfig {
    /// Scheme and host, optionally with a path prefix, without the
    /// provider-specific route.
    #[builder(setter(into))]
    pub base_url: String,

    #[builder(default = DEFAULT_TIMEOUT)]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

impl ProviderConfig {
    /// A config for `base_url` with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::builder().base_url(base_url).build()
    }
}

/// Settings for the three providers of the standard chain.
#[derive(Debug, Clone, TypedBuilder, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    #[builder(default = ProviderConfig::new(brasil_api::DEFAULT_BASE_URL))]
    pub brasil_api: ProviderConfig,

    #[builder(default = ProviderConfig::new(via_cep::DEFAULT_BASE_URL))]
    pub via_cep: ProviderConfig,

    #[builder(default = ProviderConfig::new(awesome_api::DEFAULT_BASE_URL))]
    pub awesome_api: ProviderConfig,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ChainConfig {
    /// Points all three providers at the same host, keeping each one's
    /// route. Mostly useful against a local stub.
    pub fn single_host(base_url: &str, timeout: Duration) -> Self {
        let config = ProviderConfig::builder()
            .base_url(base_url)
            .timeout(timeout)
            .build();
        Self {
            brasil_api: config.clone(),
            via_cep: config.clone(),
            awesome_api: config,
        }
    }
}
