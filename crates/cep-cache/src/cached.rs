use async_trait::async_trait;
use cep_core::cache::{find_key, AddressCache};
use cep_core::store::{AddressStore, Result, UpsertOutcome};
use cep_core::{AddressRecord, CepCode, ResolvedAddress};
use tracing::{debug, trace, warn};

/// A store decorator that serves reads through a cache.
///
/// Reads check the cache first and fall back to the inner store; records
/// found in the inner store are written back to the cache. Writes go straight
/// to the inner store and leave the cache alone: keeping it fresh is the job
/// of a [`FlushCacheInvalidator`](crate::FlushCacheInvalidator) sharing the
/// same cache.
///
/// Cache failures never fail a read; they are logged and the inner store
/// answers instead.
///
/// A backfill can race a concurrent write: the row read from the inner store
/// may be deleted or replaced, and the cache flushed, before the backfill
/// lands. To keep that stale copy from living for the whole TTL, the inner
/// store is read again after every backfill and the entry is dropped if the
/// row changed. Any write after that second read flushes the cache later.
#[derive(Debug, Clone)]
pub struct CachedAddressStore<S, C> {
    inner: S,
    cache: C,
}

impl<S: AddressStore, C: AddressCache> CachedAddressStore<S, C> {
    /// Creates a new cached store decorator.
    ///
    /// # Example
    ///
    /// ```rust
    /// use cep_cache::{CachedAddressStore, FlushCacheInvalidator, MokaAddressCache};
    /// use cep_storage::InMemoryAddressStore;
    ///
    /// let cache = MokaAddressCache::new();
    /// let store = CachedAddressStore::new(InMemoryAddressStore::new(), cache.clone());
    /// let invalidator = FlushCacheInvalidator::new(cache);
    /// ```
    pub fn new(inner: S, cache: C) -> Self {
        Self { inner, cache }
    }

    /// Returns a reference to the inner store.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns a reference to the cache.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    async fn drop_if_stale(&self, code: &CepCode, key: &str, cached: &AddressRecord) -> Result<()> {
        if self.inner.get(code).await?.as_ref() == Some(cached) {
            return Ok(());
        }

        debug!(code = %code, "Record changed during backfill, dropping cached copy");
        if let Err(e) = self.cache.remove(key).await {
            warn!(code = %code, error = %e, "Failed to drop stale cached record");
        }
        Ok(())
    }
}

#[async_trait]
impl<S: AddressStore, C: AddressCache> AddressStore for CachedAddressStore<S, C> {
    async fn get(&self, code: &CepCode) -> Result<Option<AddressRecord>> {
        let key = find_key(code);

        match self.cache.get(&key).await {
            Ok(Some(record)) => {
                debug!(code = %code, "Cache hit for postal code");
                return Ok(Some(record));
            }
            Ok(None) => {
                trace!(code = %code, "Cache miss for postal code");
            }
            Err(e) => {
                warn!(code = %code, error = %e, "Cache error on get, falling back to inner store");
            }
        }

        let result = self.inner.get(code).await?;

        if let Some(ref record) = result {
            match self.cache.set(&key, record).await {
                Ok(()) => self.drop_if_stale(code, &key, record).await?,
                Err(e) => warn!(code = %code, error = %e, "Failed to cache record"),
            }
        }

        Ok(result)
    }

    async fn upsert(&self, code: &CepCode, address: &ResolvedAddress) -> Result<UpsertOutcome> {
        self.inner.upsert(code, address).await
    }

    async fn delete(&self, code: &CepCode) -> Result<bool> {
        self.inner.delete(code).await
    }
}
