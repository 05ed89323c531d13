use async_trait::async_trait;
use cep_core::cache::{AddressCache, Result};
use cep_core::{AddressRecord, CacheError};
use redis::AsyncCommands;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Namespace prepended to every key this cache writes.
pub const DEFAULT_KEY_PREFIX: &str = "cep-cache:";

/// Keys examined per `SCAN` round trip during a flush.
const SCAN_BATCH: usize = 500;

/// A Redis-based implementation of [`AddressCache`].
///
/// Records are stored as JSON strings under a configurable key prefix. A
/// flush deletes every key under that prefix and leaves the rest of the
/// database alone.
#[derive(Debug, Clone)]
pub struct RedisAddressCache {
    conn: redis::aio::MultiplexedConnection,
    key_prefix: String,
    ttl: Option<Duration>,
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> CacheError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        CacheError::Timeout(message)
    } else {
        CacheError::Operation(message)
    }
}

impl RedisAddressCache {
    /// Creates a new Redis address cache with the default key prefix and no
    /// expiry.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            ttl: None,
        }
    }

    /// Creates a new Redis address cache with a custom key prefix.
    ///
    /// # Arguments
    ///
    /// * `conn` - A multiplexed Redis connection
    /// * `key_prefix` - Custom prefix for cache keys (e.g., "myapp:cep:")
    pub fn with_prefix(
        conn: redis::aio::MultiplexedConnection,
        key_prefix: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            key_prefix: key_prefix.into(),
            ttl: None,
        }
    }

    /// Expire entries `ttl` after they are written.
    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    fn cache_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

/// `PSETEX` rejects a zero expiry, so sub-millisecond TTLs round up.
fn expiry_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1)
}

/// A `SCAN MATCH` pattern for every key under `prefix`, with the prefix's
/// glob metacharacters escaped.
fn scan_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

#[async_trait]
impl AddressCache for RedisAddressCache {
    async fn get(&self, key: &str) -> Result<Option<AddressRecord>> {
        let key = self.cache_key(key);
        trace!(key = %key, "Fetching record from Redis cache");

        let mut conn = self.conn.clone();
        match conn.get::<_, Option<String>>(&key).await {
            Ok(Some(cached)) => {
                debug!(key = %key, "Cache hit in Redis");
                serde_json::from_str::<AddressRecord>(&cached)
                    .map(Some)
                    .map_err(|e| {
                        warn!(key = %key, error = %e, "Failed to deserialize cached record");
                        CacheError::InvalidData(format!(
                            "invalid cached value for key '{key}': {e}"
                        ))
                    })
            }
            Ok(None) => {
                trace!(key = %key, "Cache miss in Redis");
                Ok(None)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Redis error on get");
                Err(map_redis_error("failed to fetch value from Redis", e))
            }
        }
    }

    async fn set(&self, key: &str, record: &AddressRecord) -> Result<()> {
        let key = self.cache_key(key);

        let json = serde_json::to_string(record).map_err(|e| {
            warn!(key = %key, error = %e, "Failed to serialize record for caching");
            CacheError::Serialization(format!("failed to serialize cache value: {e}"))
        })?;

        let mut conn = self.conn.clone();
        let written = match self.ttl {
            Some(ttl) => conn.pset_ex::<_, _, ()>(&key, json, expiry_millis(ttl)).await,
            None => conn.set::<_, _, ()>(&key, json).await,
        };

        match written {
            Ok(()) => {
                debug!(key = %key, "Cached record in Redis");
                Ok(())
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to cache record in Redis");
                Err(map_redis_error("failed to write value to Redis", e))
            }
        }
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let key = self.cache_key(key);
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(&key)
            .await
            .map_err(|e| map_redis_error("failed to delete value from Redis", e))?;
        trace!(key = %key, "Removed record from Redis cache");
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        let pattern = scan_pattern(&self.key_prefix);
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut removed = 0_usize;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| map_redis_error("failed to scan Redis keys", e))?;

            if !keys.is_empty() {
                conn.del::<_, ()>(&keys)
                    .await
                    .map_err(|e| map_redis_error("failed to delete keys from Redis", e))?;
                removed += keys.len();
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        debug!(prefix = %self.key_prefix, removed, "Flushed Redis cache");
        Ok(())
    }
}
