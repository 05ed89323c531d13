use std::sync::Arc;

use cep_core::{AddressProvider, CepCode, LookupOutcome, ResolvedAddress};
use tracing::{debug, info, warn};

use crate::awesome_api::AwesomeApiProvider;
use crate::brasil_api::BrasilApiProvider;
use crate::config::ChainConfig;
use crate::error::Result;
use crate::via_cep::ViaCepProvider;

/// Result of walking the whole chain for one code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    Resolved {
        provider: &'static str,
        address: ResolvedAddress,
    },
    /// Every provider missed or was unavailable.
    AllMissed,
}

/// An ordered list of providers, asked one at a time until one resolves the
/// code.
///
/// The order is fixed at construction. A later provider is only contacted
/// after every earlier one missed or was unavailable, and the first
/// resolved answer is returned as is.
#[derive(Clone)]
pub struct ProviderChain {
    providers: Vec<Arc<dyn AddressProvider>>,
}

impl std::fmt::Debug for ProviderChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderChain")
            .field("providers", &self.provider_ids())
            .finish()
    }
}

impl ProviderChain {
    pub fn new(providers: Vec<Arc<dyn AddressProvider>>) -> Self {
        Self { providers }
    }

    /// BrasilAPI, then ViaCEP, then AwesomeAPI.
    pub fn standard(config: &ChainConfig) -> Result<Self> {
        Ok(Self::new(vec![
            Arc::new(BrasilApiProvider::new(config.brasil_api.clone())?),
            Arc::new(ViaCepProvider::new(config.via_cep.clone())?),
            Arc::new(AwesomeApiProvider::new(config.awesome_api.clone())?),
        ]))
    }

    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    pub async fn resolve(&self, code: &CepCode) -> ChainOutcome {
        for provider in &self.providers {
            match provider.lookup(code).await {
                LookupOutcome::Resolved(address) => {
                    info!(code = %code, provider = provider.id(), "Resolved postal code");
                    return ChainOutcome::Resolved {
                        provider: provider.id(),
                        address,
                    };
                }
                LookupOutcome::Miss => {
                    debug!(code = %code, provider = provider.id(), "Provider does not know postal code");
                }
                LookupOutcome::Unavailable(reason) => {
                    warn!(code = %code, provider = provider.id(), error = %reason, "Provider unavailable");
                }
            }
        }

        debug!(code = %code, "No provider resolved postal code");
        ChainOutcome::AllMissed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedProvider {
        id: &'static str,
        outcome: LookupOutcome,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        fn new(id: &'static str, outcome: LookupOutcome) -> Arc<Self> {
            Arc::new(Self {
                id,
                outcome,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AddressProvider for FixedProvider {
        fn id(&self) -> &'static str {
            self.id
        }

        async fn lookup(&self, _code: &CepCode) -> LookupOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn address(city: &str) -> ResolvedAddress {
        ResolvedAddress {
            state: "SP".to_string(),
            city: city.to_string(),
            ..ResolvedAddress::default()
        }
    }

    fn code() -> CepCode {
        CepCode::new_unchecked("01310100")
    }

    #[tokio::test]
    async fn first_resolved_wins() {
        let a = FixedProvider::new("A", LookupOutcome::Resolved(address("São Paulo")));
        let b = FixedProvider::new("B", LookupOutcome::Resolved(address("Osasco")));
        let chain = ProviderChain::new(vec![a.clone(), b.clone()]);

        assert_eq!(
            chain.resolve(&code()).await,
            ChainOutcome::Resolved {
                provider: "A",
                address: address("São Paulo"),
            }
        );
        assert_eq!(a.calls(), 1);
        assert_eq!(b.calls(), 0);
    }

    #[tokio::test]
    async fn miss_and_unavailable_advance() {
        let a = FixedProvider::new("A", LookupOutcome::Unavailable("timeout".to_string()));
        let b = FixedProvider::new("B", LookupOutcome::Miss);
        let c = FixedProvider::new("C", LookupOutcome::Resolved(address("Campinas")));
        let chain = ProviderChain::new(vec![a.clone(), b.clone(), c.clone()]);

        let outcome = chain.resolve(&code()).await;
        assert!(matches!(outcome, ChainOutcome::Resolved { provider: "C", .. }));
        assert_eq!((a.calls(), b.calls(), c.calls()), (1, 1, 1));
    }

    #[tokio::test]
    async fn exhausted_chain_reports_all_missed() {
        let a = FixedProvider::new("A", LookupOutcome::Miss);
        let b = FixedProvider::new("B", LookupOutcome::Unavailable("500".to_string()));
        let chain = ProviderChain::new(vec![a, b]);

        assert_eq!(chain.resolve(&code()).await, ChainOutcome::AllMissed);
    }

    #[tokio::test]
    async fn empty_chain_reports_all_missed() {
        let chain = ProviderChain::new(Vec::new());
        assert_eq!(chain.resolve(&code()).await, ChainOutcome::AllMissed);
    }

    #[test]
    fn standard_chain_order_is_fixed() {
        let chain = ProviderChain::standard(&ChainConfig::default()).unwrap();
        assert_eq!(chain.provider_ids(), vec!["BRASIL_API", "VIA_CEP", "AWESOME_API"]);
    }
}
