use crate::address::ResolvedAddress;
use crate::code::CepCode;
use async_trait::async_trait;

/// What a single provider said about a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The provider knows the code.
    Resolved(ResolvedAddress),
    /// The provider answered, and the answer is "unknown code".
    Miss,
    /// The provider could not be asked: connection failure, timeout,
    /// bad status or an unreadable body.
    Unavailable(String),
}

/// One external address source.
///
/// Implementations never fail: every transport or payload problem is folded
/// into [`LookupOutcome::Unavailable`] or [`LookupOutcome::Miss`].
#[async_trait]
pub trait AddressProvider: Send + Sync {
    /// Stable identifier used in logs, e.g. `"BRASIL_API"`.
    fn id(&self) -> &'static str;

    /// Looks up a single normalized code.
    async fn lookup(&self, code: &CepCode) -> LookupOutcome;
}
