use async_trait::async_trait;
use cep_core::cache::{AddressCache, Result};
use cep_core::AddressRecord;
use moka::future::Cache;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// Default lifetime of a cached query result: one day.
pub const DEFAULT_TTL: Duration = Duration::from_secs(86_400);

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-memory cache implementation using Moka.
///
/// Suited to single-node deployments, or as the cache in front of a remote
/// store when every writer shares the same process.
#[derive(Debug, Clone)]
pub struct MokaAddressCache {
    cache: Cache<String, AddressRecord>,
}

impl MokaAddressCache {
    /// Creates a cache holding up to 10,000 entries for [`DEFAULT_TTL`].
    pub fn new() -> Self {
        CacheConfig::default().into()
    }

    /// Creates a cache whose entries expire `ttl` after insertion.
    pub fn with_ttl(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Returns a builder for creating a custom cache configuration.
    pub fn builder() -> CacheConfigBuilder {
        CacheConfig::builder()
    }
}

impl Default for MokaAddressCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AddressCache for MokaAddressCache {
    async fn get(&self, key: &str) -> Result<Option<AddressRecord>> {
        match self.cache.get(key).await {
            Some(record) => {
                debug!(key, "Cache hit in Moka");
                Ok(Some(record))
            }
            None => {
                trace!(key, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, record: &AddressRecord) -> Result<()> {
        self.cache.insert(key.to_owned(), record.clone()).await;
        debug!(key, "Cached record in Moka");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.cache.invalidate(key).await;
        trace!(key, "Removed record from Moka");
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        self.cache.invalidate_all();
        debug!("Flushed Moka cache");
        Ok(())
    }
}

/// Configuration for creating a [`MokaAddressCache`].
///
/// Unset capacity and TTL fall back to 10,000 entries and [`DEFAULT_TTL`].
#[derive(Debug, Clone, Default, TypedBuilder, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of entries the cache can hold.
    #[builder(default, setter(strip_option))]
    pub max_capacity: Option<u64>,
    /// Time-to-live for cache entries.
    #[builder(default, setter(strip_option))]
    pub ttl: Option<Duration>,
    /// Time-to-idle for cache entries.
    #[builder(default, setter(strip_option))]
    pub tti: Option<Duration>,
}

impl From<CacheConfig> for MokaAddressCache {
    fn from(config: CacheConfig) -> Self {
        let mut builder = Cache::builder()
            .max_capacity(config.max_capacity.unwrap_or(DEFAULT_MAX_CAPACITY))
            .time_to_live(config.ttl.unwrap_or(DEFAULT_TTL));

        if let Some(tti) = config.tti {
            builder = builder.time_to_idle(tti);
        }

        MokaAddressCache {
            cache: builder.build(),
        }
    }
}
