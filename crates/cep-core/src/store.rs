use crate::address::{AddressRecord, ResolvedAddress};
use crate::code::CepCode;
use crate::error::StorageError;
use async_trait::async_trait;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Whether an upsert inserted a new row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Durable mapping from normalized code to the last-known address.
///
/// No isolation between [`get`](Self::get) and a later
/// [`upsert`](Self::upsert) is assumed.
#[async_trait]
pub trait AddressStore: Send + Sync + 'static {
    /// Exact-key lookup. Returns `None` if the code is not stored.
    async fn get(&self, code: &CepCode) -> Result<Option<AddressRecord>>;

    /// Inserts the address, or overwrites every field of the existing row,
    /// and bumps `updated_at`. Repeating the call with the same data leaves
    /// the same stored values.
    async fn upsert(&self, code: &CepCode, address: &ResolvedAddress) -> Result<UpsertOutcome>;

    /// Removes the record for `code`.
    /// Returns `true` if a record existed and was removed.
    async fn delete(&self, code: &CepCode) -> Result<bool>;
}
