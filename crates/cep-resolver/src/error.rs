use cep_core::StorageError;
use cep_provider::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolverError {
    /// The record store failed. Lookups never mask these.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("provider setup failed: {0}")]
    Provider(#[from] ProviderError),
}

pub type Result<T> = std::result::Result<T, ResolverError>;
