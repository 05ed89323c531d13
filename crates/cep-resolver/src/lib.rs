//! The CEP resolver: normalizes a raw postal code, reads it from the record
//! store and, on a miss, walks the provider chain and stores the answer.
//!
//! # Example
//!
//! ```rust,no_run
//! use cep_cache::{CachedAddressStore, FlushCacheInvalidator, MokaAddressCache};
//! use cep_resolver::{telemetry, CepResolver, ResolverConfig};
//! use cep_storage::InMemoryAddressStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ResolverConfig::default();
//! telemetry::init(&config.telemetry);
//!
//! let cache = MokaAddressCache::new();
//! let store = CachedAddressStore::new(InMemoryAddressStore::new(), cache.clone());
//! let resolver = CepResolver::from_config(store, FlushCacheInvalidator::new(cache), &config)?;
//!
//! let record = resolver.find_by_code(Some("01310-100")).await?;
//! if record.is_found() {
//!     println!("{}, {} - {}", record.street, record.city, record.state);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod service;
pub mod telemetry;

pub use config::ResolverConfig;
pub use error::{ResolverError, Result};
pub use service::CepResolver;
pub use telemetry::{LogFormat, TelemetryConfig};
