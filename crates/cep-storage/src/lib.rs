//! Record store implementations for resolved addresses.

pub mod memory;
pub mod mysql;

pub use cep_core::store::{AddressStore, UpsertOutcome};
pub use cep_core::StorageError;
pub use memory::InMemoryAddressStore;
pub use mysql::MySqlAddressStore;
