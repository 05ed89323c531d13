use cep_provider::ChainConfig;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::telemetry::TelemetryConfig;

/// Everything needed to build a [`CepResolver`](crate::CepResolver) apart
/// from its store and invalidator.
#[derive(Debug, Clone, Default, TypedBuilder, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    #[builder(default)]
    pub chain: ChainConfig,

    #[builder(default)]
    pub telemetry: TelemetryConfig,
}
