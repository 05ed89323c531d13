use thiserror::Error;

/// Reasons a raw postal code cannot be turned into a lookup key.
///
/// None of these are failures from the caller's point of view: the resolver
/// answers every one of them with the not-found sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("postal code input is empty")]
    EmptyInput,
    #[error("postal code has too few significant digits: {0}")]
    TooShort(String),
    #[error("postal code must contain only digits: {0}")]
    NonDigit(String),
    #[error("postal code is not in canonical form: {0}")]
    NotCanonical(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
}

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("cache operation timed out: {0}")]
    Timeout(String),
    #[error("cache serialization failed: {0}")]
    Serialization(String),
    #[error("cache value is invalid: {0}")]
    InvalidData(String),
    #[error("cache operation failed: {0}")]
    Operation(String),
}
