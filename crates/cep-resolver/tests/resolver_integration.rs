use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cep_cache::{AddressCache, CachedAddressStore, FlushCacheInvalidator, MokaAddressCache};
use cep_core::cache::find_key;
use cep_core::store::Result as StoreResult;
use cep_core::{
    AddressRecord, AddressStore, CepCode, NoopInvalidator, ResolvedAddress, StorageError,
    UpsertOutcome,
};
use cep_provider::ChainConfig;
use cep_resolver::{CepResolver, ResolverConfig, ResolverError};
use cep_storage::InMemoryAddressStore;
use cep_test_infra::http::{StubResponse, StubServer};

const BRASIL_API_PATH: &str = "/api/cep/v1/01310100";
const VIA_CEP_PATH: &str = "/ws/01310100/json/";
const AWESOME_API_PATH: &str = "/json/01310100";

const BRASIL_API_BODY: &str = r#"{"cep":"01310100","state":"SP","city":"São Paulo","neighborhood":"Bela Vista","street":"Avenida Paulista"}"#;
const VIA_CEP_BODY: &str = r#"{"cep":"01310-100","logradouro":"Avenida Paulista","bairro":"Bela Vista","localidade":"São Paulo","uf":"SP"}"#;

fn config_for(server: &StubServer) -> ResolverConfig {
    ResolverConfig::builder()
        .chain(ChainConfig::single_host(
            &server.base_url(),
            Duration::from_secs(5),
        ))
        .build()
}

fn code() -> CepCode {
    CepCode::new_unchecked("01310100")
}

fn paulista() -> ResolvedAddress {
    ResolvedAddress {
        state: "SP".to_string(),
        city: "São Paulo".to_string(),
        neighborhood: "Bela Vista".to_string(),
        street: "Avenida Paulista".to_string(),
    }
}

#[tokio::test]
async fn store_hit_makes_no_provider_calls() {
    let server = StubServer::start([(BRASIL_API_PATH, StubResponse::json(BRASIL_API_BODY))])
        .await
        .unwrap();
    let store = InMemoryAddressStore::new();
    let moved = ResolvedAddress {
        neighborhood: "Cerqueira César".to_string(),
        ..paulista()
    };
    store.upsert(&code(), &moved).await.unwrap();

    let resolver = CepResolver::from_config(store, NoopInvalidator, &config_for(&server)).unwrap();
    let record = resolver.find_by_code(Some("01310-100")).await.unwrap();

    assert_eq!(record.neighborhood, "Cerqueira César");
    assert_eq!(server.total_hits(), 0);
}

#[tokio::test]
async fn first_provider_result_is_stored() {
    let server = StubServer::start([
        (BRASIL_API_PATH, StubResponse::json(BRASIL_API_BODY)),
        (VIA_CEP_PATH, StubResponse::json(VIA_CEP_BODY)),
    ])
    .await
    .unwrap();
    let resolver = CepResolver::from_config(
        InMemoryAddressStore::new(),
        NoopInvalidator,
        &config_for(&server),
    )
    .unwrap();

    let record = resolver.find_by_code(Some("01310-100")).await.unwrap();

    assert_eq!(record.street, "Avenida Paulista");
    assert_eq!(server.hits(BRASIL_API_PATH), 1);
    assert_eq!(server.hits(VIA_CEP_PATH), 0);
    assert_eq!(server.hits(AWESOME_API_PATH), 0);

    let stored = resolver.store().get(&code()).await.unwrap().unwrap();
    assert_eq!(stored.city, "São Paulo");
}

#[tokio::test]
async fn unavailable_first_provider_falls_back() {
    let server = StubServer::start([
        (BRASIL_API_PATH, StubResponse::status(500)),
        (VIA_CEP_PATH, StubResponse::json(VIA_CEP_BODY)),
    ])
    .await
    .unwrap();
    let resolver = CepResolver::from_config(
        InMemoryAddressStore::new(),
        NoopInvalidator,
        &config_for(&server),
    )
    .unwrap();

    let record = resolver.find_by_code(Some("01310100")).await.unwrap();

    assert_eq!(record.neighborhood, "Bela Vista");
    assert_eq!(server.hits(AWESOME_API_PATH), 0);
}

#[tokio::test]
async fn exhausted_chain_returns_sentinel_and_stores_nothing() {
    let server = StubServer::start([
        (BRASIL_API_PATH, StubResponse::status(500)),
        (VIA_CEP_PATH, StubResponse::json(r#"{"erro": true}"#)),
        (AWESOME_API_PATH, StubResponse::json("null")),
    ])
    .await
    .unwrap();
    let resolver = CepResolver::from_config(
        InMemoryAddressStore::new(),
        NoopInvalidator,
        &config_for(&server),
    )
    .unwrap();

    assert_eq!(
        resolver.find_by_code(Some("01310-100")).await.unwrap(),
        AddressRecord::not_found()
    );
    assert_eq!(
        resolver.find_by_code(Some("01310-100")).await.unwrap(),
        AddressRecord::not_found()
    );

    assert!(resolver.store().is_empty());
    assert_eq!(server.hits(BRASIL_API_PATH), 2);
    assert_eq!(server.hits(AWESOME_API_PATH), 2);
}

#[tokio::test]
async fn degenerate_input_makes_no_network_calls() {
    let server = StubServer::start([(BRASIL_API_PATH, StubResponse::json(BRASIL_API_BODY))])
        .await
        .unwrap();
    let resolver = CepResolver::from_config(
        InMemoryAddressStore::new(),
        NoopInvalidator,
        &config_for(&server),
    )
    .unwrap();

    for raw in [None, Some(""), Some("123"), Some(" - ")] {
        assert!(!resolver.check_exists(raw).await.unwrap());
    }
    assert_eq!(server.total_hits(), 0);
}

#[tokio::test]
async fn concurrent_misses_both_walk_the_chain() {
    let server = StubServer::start([(
        BRASIL_API_PATH,
        StubResponse::Delayed {
            delay: Duration::from_millis(200),
            status: 200,
            body: BRASIL_API_BODY.to_string(),
        },
    )])
    .await
    .unwrap();
    let resolver = CepResolver::from_config(
        InMemoryAddressStore::new(),
        NoopInvalidator,
        &config_for(&server),
    )
    .unwrap();

    let (first, second) = tokio::join!(
        resolver.find_by_code(Some("01310100")),
        resolver.find_by_code(Some("01310-100")),
    );

    assert_eq!(first.unwrap().city, "São Paulo");
    assert_eq!(second.unwrap().city, "São Paulo");
    assert_eq!(server.hits(BRASIL_API_PATH), 2);
    assert_eq!(resolver.store().len(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn cached_read_is_flushed_after_delete() {
    let server = StubServer::start([(BRASIL_API_PATH, StubResponse::json(BRASIL_API_BODY))])
        .await
        .unwrap();
    let cache = MokaAddressCache::new();
    let store = CachedAddressStore::new(InMemoryAddressStore::new(), cache.clone());
    let resolver = CepResolver::from_config(
        store,
        FlushCacheInvalidator::new(cache.clone()),
        &config_for(&server),
    )
    .unwrap();
    let key = find_key(&code());

    resolver.find_by_code(Some("01310100")).await.unwrap();

    // Reads served by the store populate the cache once the flush for the
    // insert has run.
    awaitility::at_most(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(10))
        .until_async(|| {
            let resolver = resolver.clone();
            let cache = cache.clone();
            let key = key.clone();
            async move {
                resolver.find_by_code(Some("01310100")).await.unwrap();
                cache.get(&key).await.unwrap().is_some()
            }
        })
        .await;
    assert_eq!(server.hits(BRASIL_API_PATH), 1);

    assert!(resolver.delete(Some("01310-100")).await.unwrap());

    awaitility::at_most(Duration::from_secs(5))
        .poll_interval(Duration::from_millis(10))
        .until_async(|| {
            let cache = cache.clone();
            let key = key.clone();
            async move { cache.get(&key).await.unwrap().is_none() }
        })
        .await;

    assert!(resolver.store().inner().is_empty());
}

/// A store whose backend is down.
struct DownStore;

#[async_trait]
impl AddressStore for DownStore {
    async fn get(&self, _code: &CepCode) -> StoreResult<Option<AddressRecord>> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }

    async fn upsert(&self, _code: &CepCode, _address: &ResolvedAddress) -> StoreResult<UpsertOutcome> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }

    async fn delete(&self, _code: &CepCode) -> StoreResult<bool> {
        Err(StorageError::Unavailable("connection refused".to_string()))
    }
}

#[tokio::test]
async fn store_failures_are_not_masked() {
    let server = StubServer::start([(BRASIL_API_PATH, StubResponse::json(BRASIL_API_BODY))])
        .await
        .unwrap();
    let resolver = CepResolver::from_config(DownStore, NoopInvalidator, &config_for(&server))
        .unwrap();

    let err = resolver.find_by_code(Some("01310100")).await.unwrap_err();
    assert!(matches!(err, ResolverError::Storage(StorageError::Unavailable(_))));
    assert!(resolver.delete(Some("01310100")).await.is_err());
    assert_eq!(server.total_hits(), 0);

    // Unusable input never reaches the store.
    assert!(!resolver.check_exists(None).await.unwrap());
}

#[tokio::test]
async fn shared_resolver_across_tasks() {
    let server = StubServer::start([(BRASIL_API_PATH, StubResponse::json(BRASIL_API_BODY))])
        .await
        .unwrap();
    let resolver = Arc::new(
        CepResolver::from_config(
            InMemoryAddressStore::new(),
            NoopInvalidator,
            &config_for(&server),
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move { resolver.check_exists(Some("01310-100")).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap());
    }
    assert_eq!(resolver.store().len(), 1);
}
