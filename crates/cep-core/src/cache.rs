use crate::address::AddressRecord;
use crate::code::CepCode;
use crate::error::CacheError;
use async_trait::async_trait;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// Builds the cache key for a single-code lookup.
///
/// Keys describe the query shape rather than the row, so a flush is the only
/// safe invalidation.
pub fn find_key(code: &CepCode) -> String {
    format!("cep:find:{}", code.as_str())
}

/// A read-through cache for store query results.
///
/// Implementations can use Redis, in-memory caches, or other backends.
#[async_trait]
pub trait AddressCache: Send + Sync + 'static {
    /// Get a cached record.
    ///
    /// Returns `Ok(None)` if the key is not in the cache.
    async fn get(&self, key: &str) -> Result<Option<AddressRecord>>;

    /// Store a record under `key`.
    async fn set(&self, key: &str, record: &AddressRecord) -> Result<()>;

    /// Drop a single entry. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Drop every entry this cache owns.
    ///
    /// It is not an error if the cache is already empty.
    async fn flush(&self) -> Result<()>;
}
