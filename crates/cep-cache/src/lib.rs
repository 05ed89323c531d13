//! Read-through caching for the address store, plus the invalidator that
//! keeps it fresh.
//!
//! # Example
//!
//! ```rust
//! use cep_cache::{CachedAddressStore, FlushCacheInvalidator, MokaAddressCache};
//! use cep_storage::InMemoryAddressStore;
//!
//! // Share one cache between the read path and the invalidator.
//! let cache = MokaAddressCache::new();
//! let store = CachedAddressStore::new(InMemoryAddressStore::new(), cache.clone());
//! let invalidator = FlushCacheInvalidator::new(cache);
//! ```

pub mod cached;
pub mod invalidator;
pub mod moka;
pub mod redis;

pub use cached::CachedAddressStore;
pub use cep_core::{AddressCache, CacheError};
pub use invalidator::FlushCacheInvalidator;
pub use self::moka::{CacheConfig, MokaAddressCache};
pub use self::redis::RedisAddressCache;
