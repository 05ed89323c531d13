//! Core types and traits for CEP address resolution.
//!
//! This crate provides the normalized code type, the address record and the
//! narrow interfaces the resolver consumes: a record store, address
//! providers, a read-through cache and a mutation observer.

pub mod address;
pub mod cache;
pub mod code;
pub mod error;
pub mod invalidator;
pub mod provider;
pub mod store;

pub use address::{AddressRecord, ResolvedAddress};
pub use cache::AddressCache;
pub use code::{normalize, CepCode};
pub use error::{CacheError, NormalizeError, StorageError};
pub use invalidator::{CacheInvalidator, Mutation, NoopInvalidator};
pub use provider::{AddressProvider, LookupOutcome};
pub use store::{AddressStore, UpsertOutcome};
