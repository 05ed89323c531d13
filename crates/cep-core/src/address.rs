use crate::code::CepCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A postal code's known address.
///
/// Unknown values are empty strings, never absent. A record whose `code` is
/// empty is the not-found sentinel; it is returned to callers but never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AddressRecord {
    pub code: String,
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
    /// When the record was last written. `None` for the sentinel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl AddressRecord {
    /// The not-found sentinel: every field empty.
    pub fn not_found() -> Self {
        Self::default()
    }

    /// Builds a record for `code` from resolved address fields.
    pub fn from_resolved(code: &CepCode, address: ResolvedAddress, updated_at: Timestamp) -> Self {
        Self {
            code: code.as_str().to_owned(),
            state: address.state,
            city: address.city,
            neighborhood: address.neighborhood,
            street: address.street,
            updated_at: Some(updated_at),
        }
    }

    /// Returns `true` unless this is the not-found sentinel.
    pub fn is_found(&self) -> bool {
        !self.code.is_empty()
    }
}

/// The four address fields a provider produced for a code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvedAddress {
    pub state: String,
    pub city: String,
    pub neighborhood: String,
    pub street: String,
}
