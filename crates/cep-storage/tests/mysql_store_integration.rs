use std::time::Duration;

use cep_core::{CepCode, ResolvedAddress};
use cep_storage::{AddressStore, MySqlAddressStore, UpsertOutcome};
use cep_test_infra::mysql::MySqlServer;
use sqlx::mysql::MySqlPoolOptions;

struct Fixture {
    _mysql: MySqlServer,
    store: MySqlAddressStore,
}

impl Fixture {
    async fn start() -> Self {
        let mysql = MySqlServer::start()
            .await
            .expect("start mysql");
        let url = mysql.database_url().await.expect("mysql url");
        let pool = connect_with_retry(&url).await;

        let store = MySqlAddressStore::new(pool);
        store.ensure_schema().await.expect("create schema");

        Self {
            _mysql: mysql,
            store,
        }
    }
}

async fn connect_with_retry(url: &str) -> sqlx::MySqlPool {
    let mut last_error = None;

    for _ in 0..20 {
        match MySqlPoolOptions::new()
            .max_connections(5)
            .connect(url)
            .await
        {
            Ok(pool) => return pool,
            Err(err) => {
                last_error = Some(err);
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
        }
    }

    panic!("failed to connect mysql: {last_error:?}");
}

fn code(value: &str) -> CepCode {
    CepCode::new_unchecked(value)
}

fn address(city: &str, neighborhood: &str) -> ResolvedAddress {
    ResolvedAddress {
        state: "SP".to_string(),
        city: city.to_string(),
        neighborhood: neighborhood.to_string(),
        street: "Avenida Paulista".to_string(),
    }
}

#[tokio::test]
async fn upsert_then_get_returns_stored_row() {
    let fixture = Fixture::start().await;
    let cep = code("01310100");

    let outcome = fixture
        .store
        .upsert(&cep, &address("São Paulo", "Bela Vista"))
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Created);

    let got = fixture.store.get(&cep).await.unwrap().unwrap();
    assert_eq!(got.code, "01310100");
    assert_eq!(got.state, "SP");
    assert_eq!(got.city, "São Paulo");
    assert_eq!(got.neighborhood, "Bela Vista");
    assert_eq!(got.street, "Avenida Paulista");
    assert!(got.updated_at.is_some());
}

#[tokio::test]
async fn get_missing_code_returns_none() {
    let fixture = Fixture::start().await;

    assert!(fixture.store.get(&code("99999999")).await.unwrap().is_none());
}

#[tokio::test]
async fn second_upsert_overwrites_and_reports_update() {
    let fixture = Fixture::start().await;
    let cep = code("01310100");

    fixture
        .store
        .upsert(&cep, &address("São Paulo", "Bela Vista"))
        .await
        .unwrap();
    let first = fixture.store.get(&cep).await.unwrap().unwrap();

    tokio::time::sleep(Duration::from_millis(5)).await;

    let outcome = fixture
        .store
        .upsert(&cep, &address("São Paulo", "Jardim Paulista"))
        .await
        .unwrap();
    assert_eq!(outcome, UpsertOutcome::Updated);

    let second = fixture.store.get(&cep).await.unwrap().unwrap();
    assert_eq!(second.neighborhood, "Jardim Paulista");
    assert!(second.updated_at > first.updated_at);
}

#[tokio::test]
async fn empty_optional_fields_round_trip() {
    let fixture = Fixture::start().await;
    let cep = code("69900001");

    fixture
        .store
        .upsert(
            &cep,
            &ResolvedAddress {
                state: "AC".to_string(),
                city: "Rio Branco".to_string(),
                neighborhood: String::new(),
                street: String::new(),
            },
        )
        .await
        .unwrap();

    let got = fixture.store.get(&cep).await.unwrap().unwrap();
    assert_eq!(got.neighborhood, "");
    assert_eq!(got.street, "");
}

#[tokio::test]
async fn delete_removes_row_once() {
    let fixture = Fixture::start().await;
    let cep = code("01310100");

    fixture
        .store
        .upsert(&cep, &address("São Paulo", "Bela Vista"))
        .await
        .unwrap();

    assert!(fixture.store.delete(&cep).await.unwrap());
    assert!(!fixture.store.delete(&cep).await.unwrap());
    assert!(fixture.store.get(&cep).await.unwrap().is_none());
}
