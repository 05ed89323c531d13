use std::sync::Arc;

use cep_core::{
    normalize, AddressRecord, AddressStore, CacheInvalidator, Mutation, UpsertOutcome,
};
use cep_provider::{ChainOutcome, ProviderChain};
use jiff::Timestamp;
use tracing::{debug, trace};

use crate::config::ResolverConfig;
use crate::error::Result;

/// Resolves postal codes to addresses, reading through the record store
/// and falling back to the provider chain on a miss.
///
/// Every successful provider answer is written to the store and announced to
/// the invalidator. Lookups that nobody can answer return the not-found
/// sentinel and write nothing, so the next call for the same code asks the
/// providers again.
pub struct CepResolver<S> {
    store: Arc<S>,
    chain: Arc<ProviderChain>,
    invalidator: Arc<dyn CacheInvalidator>,
}

impl<S> Clone for CepResolver<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            chain: Arc::clone(&self.chain),
            invalidator: Arc::clone(&self.invalidator),
        }
    }
}

impl<S> std::fmt::Debug for CepResolver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CepResolver")
            .field("chain", &self.chain)
            .finish_non_exhaustive()
    }
}

impl<S: AddressStore> CepResolver<S> {
    pub fn new(store: S, chain: ProviderChain, invalidator: impl CacheInvalidator) -> Self {
        Self {
            store: Arc::new(store),
            chain: Arc::new(chain),
            invalidator: Arc::new(invalidator),
        }
    }

    /// Builds a resolver over the standard provider chain.
    pub fn from_config(
        store: S,
        invalidator: impl CacheInvalidator,
        config: &ResolverConfig,
    ) -> Result<Self> {
        let chain = ProviderChain::standard(&config.chain)?;
        Ok(Self::new(store, chain, invalidator))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Looks up the address for a raw, possibly formatted, postal code.
    ///
    /// # Returns
    ///
    /// * `Ok(record)` - The stored or freshly resolved record
    /// * `Ok(AddressRecord::not_found())` - Unusable input, or no provider
    ///   knows the code
    /// * `Err(e)` - The record store failed
    pub async fn find_by_code(&self, raw: Option<&str>) -> Result<AddressRecord> {
        let code = match normalize(raw) {
            Ok(code) => code,
            Err(e) => {
                debug!(input = ?raw, error = %e, "Rejected postal code input");
                return Ok(AddressRecord::not_found());
            }
        };

        trace!(code = %code, "resolving postal code");

        if let Some(record) = self.store.get(&code).await? {
            debug!(code = %code, "Found postal code in store");
            return Ok(record);
        }

        match self.chain.resolve(&code).await {
            ChainOutcome::Resolved { provider, address } => {
                let outcome = self.store.upsert(&code, &address).await?;
                debug!(code = %code, provider, ?outcome, "Stored resolved address");

                self.invalidator.notify(match outcome {
                    UpsertOutcome::Created => Mutation::Created(code.clone()),
                    UpsertOutcome::Updated => Mutation::Updated(code.clone()),
                });

                Ok(AddressRecord::from_resolved(&code, address, Timestamp::now()))
            }
            ChainOutcome::AllMissed => {
                debug!(code = %code, "Postal code not found by any provider");
                Ok(AddressRecord::not_found())
            }
        }
    }

    /// `true` when [`find_by_code`](Self::find_by_code) returns a real
    /// record. Resolves and stores the code as a side effect.
    pub async fn check_exists(&self, raw: Option<&str>) -> Result<bool> {
        Ok(self.find_by_code(raw).await?.is_found())
    }

    /// Removes a stored record. Returns `false` for unusable input or codes
    /// that were not stored.
    pub async fn delete(&self, raw: Option<&str>) -> Result<bool> {
        let Ok(code) = normalize(raw) else {
            return Ok(false);
        };

        let deleted = self.store.delete(&code).await?;
        if deleted {
            debug!(code = %code, "Deleted stored address");
            self.invalidator.notify(Mutation::Deleted(code));
        }

        Ok(deleted)
    }
}
