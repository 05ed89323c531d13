//! HTTP clients for the public CEP lookup services and the chain that asks
//! them in order.

pub mod awesome_api;
pub mod brasil_api;
pub mod chain;
mod client;
pub mod config;
pub mod error;
pub mod via_cep;

pub use awesome_api::AwesomeApiProvider;
pub use brasil_api::BrasilApiProvider;
pub use chain::{ChainOutcome, ProviderChain};
pub use config::{ChainConfig, ProviderConfig};
pub use error::{ProviderError, Result};
pub use via_cep::ViaCepProvider;
