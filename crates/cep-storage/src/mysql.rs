use async_trait::async_trait;
use cep_core::error::StorageError;
use cep_core::store::{AddressStore, Result, UpsertOutcome};
use cep_core::{AddressRecord, CepCode, ResolvedAddress};
use jiff::Timestamp;
use sqlx::{MySqlPool, Row};
use tracing::trace;

/// DDL for the `cep` table.
pub const SCHEMA: &str = include_str!("../ddl/mysql/cep.sql");

/// MySQL implementation of the store contract.
///
/// One row per code in the `cep` table. Timestamps are stored as unix
/// microseconds so consecutive upserts of identical data still register as
/// an update.
#[derive(Debug, Clone)]
pub struct MySqlAddressStore {
    pool: MySqlPool,
}

impl MySqlAddressStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `cep` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn parse_updated_at(micros: i64) -> Result<Timestamp> {
    Timestamp::from_microsecond(micros).map_err(|e| {
        StorageError::InvalidData(format!("invalid updated_at timestamp '{micros}': {e}"))
    })
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl AddressStore for MySqlAddressStore {
    async fn get(&self, code: &CepCode) -> Result<Option<AddressRecord>> {
        let row = sqlx::query(
            r#"
            SELECT cep, state, city, neighborhood, street, updated_at
            FROM cep
            WHERE cep = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let updated_at: i64 = row.try_get("updated_at").map_err(map_sqlx_error)?;

        Ok(Some(AddressRecord {
            code: row.try_get("cep").map_err(map_sqlx_error)?,
            state: row.try_get("state").map_err(map_sqlx_error)?,
            city: row.try_get("city").map_err(map_sqlx_error)?,
            neighborhood: row.try_get("neighborhood").map_err(map_sqlx_error)?,
            street: row.try_get("street").map_err(map_sqlx_error)?,
            updated_at: Some(parse_updated_at(updated_at)?),
        }))
    }

    async fn upsert(&self, code: &CepCode, address: &ResolvedAddress) -> Result<UpsertOutcome> {
        let now = Timestamp::now().as_microsecond();

        let result = sqlx::query(
            r#"
            INSERT INTO cep (cep, state, city, neighborhood, street, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                state = VALUES(state),
                city = VALUES(city),
                neighborhood = VALUES(neighborhood),
                street = VALUES(street),
                updated_at = VALUES(updated_at)
            "#,
        )
        .bind(code.as_str())
        .bind(address.state.as_str())
        .bind(address.city.as_str())
        .bind(address.neighborhood.as_str())
        .bind(address.street.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        // MySQL reports 1 affected row for an insert and 2 for an update.
        let outcome = if result.rows_affected() == 1 {
            UpsertOutcome::Created
        } else {
            UpsertOutcome::Updated
        };
        trace!(code = %code, ?outcome, "upserted address row");

        Ok(outcome)
    }

    async fn delete(&self, code: &CepCode) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM cep
            WHERE cep = ?
            "#,
        )
        .bind(code.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}
