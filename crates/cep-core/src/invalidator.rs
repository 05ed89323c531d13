use crate::code::CepCode;
use std::fmt::Display;

/// A change to a stored address record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Created(CepCode),
    Updated(CepCode),
    Deleted(CepCode),
}

impl Mutation {
    /// The code whose record changed.
    pub fn code(&self) -> &CepCode {
        match self {
            Mutation::Created(code) | Mutation::Updated(code) | Mutation::Deleted(code) => code,
        }
    }
}

impl Display for Mutation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mutation::Created(code) => write!(f, "created {code}"),
            Mutation::Updated(code) => write!(f, "updated {code}"),
            Mutation::Deleted(code) => write!(f, "deleted {code}"),
        }
    }
}

/// Observer notified after every successful create, update or delete.
///
/// `notify` is synchronous and must return immediately: implementations hand
/// the work to a background task and never report its outcome to the caller.
pub trait CacheInvalidator: Send + Sync + 'static {
    fn notify(&self, mutation: Mutation);
}

/// An invalidator for deployments without a secondary cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopInvalidator;

impl CacheInvalidator for NoopInvalidator {
    fn notify(&self, _mutation: Mutation) {}
}
