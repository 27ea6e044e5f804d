//! PostgreSQL entity store with serializable transactions
//!
//! Each entity type lives in its own table of (key, JSONB data) rows.
//! Patches are a JSONB merge (`data || $1`). Conditions compare each named
//! top-level field for equality, as [`Conditions::matches`] does: an array
//! condition matches only an identical array, never a superset.

use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Executor, Postgres, Row};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::domain::store::{
    from_document, id_value, Conditions, Document, Entity, EntityId, EntityStore, Patch,
    Transaction, TransactionManager, ID_FIELD,
};
use crate::domain::DomainError;

use super::storage_key;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").expect("identifier pattern is valid")
});

/// SQLSTATEs that mean "another transaction got there first"
const CONFLICT_CODES: [&str; 3] = [
    "40001", // serialization_failure
    "40P01", // deadlock_detected
    "23505", // unique_violation
];

/// Rows whose fields equal every field of the `$1` conditions object
///
/// `@>` alone would also accept arrays and objects that merely contain the
/// condition value; the `NOT EXISTS` keeps it to exact equality.
const FILTER: &str = "data @> $1 AND NOT EXISTS (\
    SELECT 1 FROM jsonb_each($1) AS c(field, value) \
    WHERE data->c.field IS DISTINCT FROM c.value)";

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/pmp_data_layer".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_connect_timeout(mut self, secs: u64) -> Self {
        self.connect_timeout_secs = secs;
        self
    }

    pub async fn connect(&self) -> Result<PgPool, DomainError> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout_secs))
            .connect(&self.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))
    }
}

fn check_identifier(kind: &str, name: &str) -> Result<(), DomainError> {
    if IDENTIFIER.is_match(name) {
        Ok(())
    } else {
        Err(DomainError::configuration(format!(
            "Invalid {} name '{}': use lowercase letters, digits and underscores",
            kind, name
        )))
    }
}

fn is_conflict_code(code: &str) -> bool {
    CONFLICT_CODES.iter().any(|c| *c == code)
}

/// Maps a driver error, surfacing contention as `Conflict`
fn map_sqlx_error(action: &str, e: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().is_some_and(|code| is_conflict_code(&code)) {
            return DomainError::conflict(format!("{} conflicted: {}", action, db.message()));
        }
    }

    DomainError::storage(format!("Failed to {}: {}", action, e))
}

fn row_to_entity<E: Entity>(row: &sqlx::postgres::PgRow) -> Result<E, DomainError> {
    match row.get::<Value, _>("data") {
        Value::Object(document) => from_document(document),
        other => Err(DomainError::storage(format!(
            "Stored {} is not a JSON object: {}",
            E::TYPE_NAME,
            other
        ))),
    }
}

/// SQL for one entity table, runnable on the pool or inside a transaction
#[derive(Debug, Clone)]
struct Table {
    name: Arc<str>,
}

impl Table {
    async fn find_by_id<'c, E, X>(&self, exec: X, id: &E::Id) -> Result<Option<E>, DomainError>
    where
        E: Entity,
        X: Executor<'c, Database = Postgres>,
    {
        let key = storage_key(&id_value(id)?);
        let query = format!("SELECT data FROM {} WHERE key = $1", self.name);

        let row = sqlx::query(&query)
            .bind(&key)
            .fetch_optional(exec)
            .await
            .map_err(|e| map_sqlx_error("load entity", e))?;

        row.as_ref().map(row_to_entity::<E>).transpose()
    }

    async fn find_where<'c, E, X>(&self, exec: X, conditions: &Conditions) -> Result<Vec<E>, DomainError>
    where
        E: Entity,
        X: Executor<'c, Database = Postgres>,
    {
        let Some(filter) = conditions.to_object() else {
            return Ok(Vec::new());
        };
        let query = format!(
            "SELECT data FROM {} WHERE {} ORDER BY created_at",
            self.name, FILTER
        );

        let rows = sqlx::query(&query)
            .bind(filter)
            .fetch_all(exec)
            .await
            .map_err(|e| map_sqlx_error("query entities", e))?;

        rows.iter().map(row_to_entity::<E>).collect()
    }

    async fn update_where<'c, X>(
        &self,
        exec: X,
        conditions: &Conditions,
        patch: &Patch,
    ) -> Result<u64, DomainError>
    where
        X: Executor<'c, Database = Postgres>,
    {
        let Some(filter) = conditions.to_object() else {
            return Ok(0);
        };
        let query = format!(
            "UPDATE {} SET data = data || $2, updated_at = NOW() WHERE {}",
            self.name, FILTER
        );

        let result = sqlx::query(&query)
            .bind(filter)
            .bind(Value::Object(patch.as_map().clone()))
            .execute(exec)
            .await
            .map_err(|e| map_sqlx_error("update entities", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_where<'c, X>(&self, exec: X, conditions: &Conditions) -> Result<u64, DomainError>
    where
        X: Executor<'c, Database = Postgres>,
    {
        let Some(filter) = conditions.to_object() else {
            return Ok(0);
        };
        let query = format!("DELETE FROM {} WHERE {}", self.name, FILTER);

        let result = sqlx::query(&query)
            .bind(filter)
            .execute(exec)
            .await
            .map_err(|e| map_sqlx_error("delete entities", e))?;

        Ok(result.rows_affected())
    }

    async fn insert<'c, E, X>(&self, exec: X, mut data: Document) -> Result<E, DomainError>
    where
        E: Entity,
        X: Executor<'c, Database = Postgres>,
    {
        let id = id_value(&E::Id::generate())?;
        let key = storage_key(&id);
        data.insert(ID_FIELD.to_string(), id);

        let entity = from_document::<E>(data.clone())?;
        let query = format!("INSERT INTO {} (key, data) VALUES ($1, $2)", self.name);

        sqlx::query(&query)
            .bind(&key)
            .bind(Value::Object(data))
            .execute(exec)
            .await
            .map_err(|e| map_sqlx_error("insert entity", e))?;

        Ok(entity)
    }
}

/// Store for one entity type backed by a PostgreSQL table
pub struct PostgresStore<E> {
    pool: PgPool,
    table: Table,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PostgresStore<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            table: self.table.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Debug for PostgresStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStore")
            .field("entity_type", &E::TYPE_NAME)
            .field("table", &self.table.name)
            .finish()
    }
}

impl<E: Entity> PostgresStore<E> {
    pub fn new(pool: PgPool, table_name: &str) -> Result<Self, DomainError> {
        check_identifier("table", table_name)?;

        Ok(Self {
            pool,
            table: Table {
                name: Arc::from(table_name),
            },
            _entity: PhantomData,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates the backing table if it does not exist yet
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                key VARCHAR(255) PRIMARY KEY,
                data JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.table.name
        );

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create table", e))?;

        info!(table = %self.table.name, entity_type = E::TYPE_NAME, "Ensured entity table");
        Ok(())
    }

    /// Enforces uniqueness of a top-level document field
    ///
    /// Concurrent inserts of the same value then fail with `Conflict`
    /// instead of creating duplicates. With `case_insensitive` the index is
    /// built on the lowercased value.
    pub async fn ensure_unique_index(
        &self,
        field: &str,
        case_insensitive: bool,
    ) -> Result<(), DomainError> {
        check_identifier("field", field)?;

        let query = unique_index_sql(&self.table.name, field, case_insensitive);

        sqlx::query(&query)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("create unique index", e))?;

        Ok(())
    }
}

fn unique_index_sql(table: &str, field: &str, case_insensitive: bool) -> String {
    if case_insensitive {
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {table}_{field}_ci_unique ON {table} ((lower(data->>'{field}')))"
        )
    } else {
        format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS {table}_{field}_unique ON {table} ((data->>'{field}'))"
        )
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for PostgresStore<E> {
    async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, DomainError> {
        self.table.find_by_id::<E, _>(&self.pool, id).await
    }

    async fn find_where(&self, conditions: &Conditions) -> Result<Vec<E>, DomainError> {
        self.table.find_where::<E, _>(&self.pool, conditions).await
    }

    async fn update_where(&self, conditions: &Conditions, patch: &Patch) -> Result<u64, DomainError> {
        self.table.update_where(&self.pool, conditions, patch).await
    }

    async fn delete_where(&self, conditions: &Conditions) -> Result<u64, DomainError> {
        self.table.delete_where(&self.pool, conditions).await
    }

    async fn insert(&self, data: Document) -> Result<E, DomainError> {
        self.table.insert::<E, _>(&self.pool, data).await
    }
}

#[async_trait]
impl<E: Entity> TransactionManager for PostgresStore<E> {
    type Tx = PostgresTransaction<E>;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin transaction", e))?;

        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("set isolation level", e))?;

        debug!(table = %self.table.name, "Serializable transaction started");

        Ok(PostgresTransaction {
            tx: Arc::new(Mutex::new(Some(tx))),
            table: self.table.clone(),
            _entity: PhantomData,
        })
    }
}

/// Open serializable transaction on a [`PostgresStore`]
///
/// Dropped without `commit`, the driver rolls it back.
pub struct PostgresTransaction<E> {
    tx: Arc<Mutex<Option<sqlx::Transaction<'static, Postgres>>>>,
    table: Table,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for PostgresTransaction<E> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
            table: self.table.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Debug for PostgresTransaction<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresTransaction")
            .field("entity_type", &E::TYPE_NAME)
            .field("table", &self.table.name)
            .finish_non_exhaustive()
    }
}

fn finished() -> DomainError {
    DomainError::storage("Transaction already finished")
}

#[async_trait]
impl<E: Entity> EntityStore<E> for PostgresTransaction<E> {
    async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, DomainError> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        self.table.find_by_id::<E, _>(&mut **tx, id).await
    }

    async fn find_where(&self, conditions: &Conditions) -> Result<Vec<E>, DomainError> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        self.table.find_where::<E, _>(&mut **tx, conditions).await
    }

    async fn update_where(&self, conditions: &Conditions, patch: &Patch) -> Result<u64, DomainError> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        self.table.update_where(&mut **tx, conditions, patch).await
    }

    async fn delete_where(&self, conditions: &Conditions) -> Result<u64, DomainError> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        self.table.delete_where(&mut **tx, conditions).await
    }

    async fn insert(&self, data: Document) -> Result<E, DomainError> {
        let mut guard = self.tx.lock().await;
        let tx = guard.as_mut().ok_or_else(finished)?;
        self.table.insert::<E, _>(&mut **tx, data).await
    }
}

#[async_trait]
impl<E: Entity> Transaction for PostgresTransaction<E> {
    async fn commit(&self) -> Result<(), DomainError> {
        let tx = self.tx.lock().await.take().ok_or_else(finished)?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit transaction", e))
    }

    async fn rollback(&self) -> Result<(), DomainError> {
        let tx = self.tx.lock().await.take().ok_or_else(finished)?;

        tx.rollback()
            .await
            .map_err(|e| map_sqlx_error("roll back transaction", e))
    }
}
