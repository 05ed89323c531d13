use async_trait::async_trait;
use cep_core::store::{AddressStore, Result, UpsertOutcome};
use cep_core::{AddressRecord, CepCode, ResolvedAddress};
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use jiff::Timestamp;

/// In-memory storage entry for one postal code.
#[derive(Debug, Clone)]
struct Entry {
    address: ResolvedAddress,
    updated_at: Timestamp,
}

impl Entry {
    fn new(address: &ResolvedAddress) -> Self {
        Self {
            address: address.clone(),
            updated_at: Timestamp::now(),
        }
    }

    fn into_record(self, code: &str) -> AddressRecord {
        AddressRecord {
            code: code.to_owned(),
            state: self.address.state,
            city: self.address.city,
            neighborhood: self.address.neighborhood,
            street: self.address.street,
            updated_at: Some(self.updated_at),
        }
    }
}

/// In-memory implementation of [`AddressStore`] using DashMap.
///
/// DashMap shards its locks, so concurrent upserts for different codes do
/// not block each other.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressStore {
    storage: DashMap<String, Entry>,
}

impl InMemoryAddressStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            storage: DashMap::new(),
        }
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl AddressStore for InMemoryAddressStore {
    async fn get(&self, code: &CepCode) -> Result<Option<AddressRecord>> {
        let key = code.as_str();

        Ok(self
            .storage
            .get(key)
            .map(|entry| entry.clone().into_record(key)))
    }

    async fn upsert(&self, code: &CepCode, address: &ResolvedAddress) -> Result<UpsertOutcome> {
        match self.storage.entry(code.as_str().to_owned()) {
            MapEntry::Occupied(mut occupied) => {
                occupied.insert(Entry::new(address));
                Ok(UpsertOutcome::Updated)
            }
            MapEntry::Vacant(vacant) => {
                vacant.insert(Entry::new(address));
                Ok(UpsertOutcome::Created)
            }
        }
    }

    async fn delete(&self, code: &CepCode) -> Result<bool> {
        Ok(self.storage.remove(code.as_str()).is_some())
    }
}
