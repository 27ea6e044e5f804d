//! In-memory entity store with serialized transactions

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::domain::store::{
    from_document, id_value, Conditions, Document, Entity, EntityId, EntityStore, Patch,
    Transaction, TransactionManager, ID_FIELD,
};
use crate::domain::DomainError;

use super::storage_key;

/// Documents keyed by their rendered id
#[derive(Debug, Clone, Default)]
struct Table {
    rows: HashMap<String, Document>,
}

impl Table {
    fn find_by_id<E: Entity>(&self, id: &E::Id) -> Result<Option<E>, DomainError> {
        let key = storage_key(&id_value(id)?);

        self.rows
            .get(&key)
            .cloned()
            .map(from_document::<E>)
            .transpose()
    }

    fn find_where<E: Entity>(&self, conditions: &Conditions) -> Result<Vec<E>, DomainError> {
        self.rows
            .values()
            .filter(|doc| conditions.matches(doc))
            .cloned()
            .map(from_document::<E>)
            .collect()
    }

    fn check_unique(
        &self,
        unique_fields: &[String],
        key: &str,
        doc: &Document,
    ) -> Result<(), DomainError> {
        for field in unique_fields {
            let Some(value) = doc.get(field) else {
                continue;
            };

            let taken = self
                .rows
                .iter()
                .any(|(other_key, other)| other_key != key && other.get(field) == Some(value));

            if taken {
                return Err(DomainError::conflict(format!(
                    "Unique constraint on '{}' violated",
                    field
                )));
            }
        }

        Ok(())
    }

    fn update_where(
        &mut self,
        unique_fields: &[String],
        conditions: &Conditions,
        patch: &Patch,
    ) -> Result<u64, DomainError> {
        let keys: Vec<String> = self
            .rows
            .iter()
            .filter(|(_, doc)| conditions.matches(doc))
            .map(|(key, _)| key.clone())
            .collect();

        // Check every patched row before writing any of them
        let mut patched = Vec::with_capacity(keys.len());
        for key in keys {
            let mut doc = self.rows[&key].clone();
            patch.apply(&mut doc);
            self.check_unique(unique_fields, &key, &doc)?;
            patched.push((key, doc));
        }

        let count = patched.len() as u64;
        self.rows.extend(patched);

        Ok(count)
    }

    fn delete_where(&mut self, conditions: &Conditions) -> u64 {
        let before = self.rows.len();
        self.rows.retain(|_, doc| !conditions.matches(doc));
        (before - self.rows.len()) as u64
    }

    fn insert<E: Entity>(
        &mut self,
        unique_fields: &[String],
        mut data: Document,
    ) -> Result<E, DomainError> {
        let id = id_value(&E::Id::generate())?;
        let key = storage_key(&id);
        data.insert(ID_FIELD.to_string(), id);

        let entity = from_document::<E>(data.clone())?;

        if self.rows.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "{} '{}' already exists",
                E::TYPE_NAME,
                key
            )));
        }
        self.check_unique(unique_fields, &key, &data)?;

        self.rows.insert(key, data);
        Ok(entity)
    }
}

/// Thread-safe in-memory store for one entity type
///
/// Plain operations lock the table for their own duration. A transaction
/// holds the table lock from `begin` until it finishes, so transactions are
/// fully serialized and writes outside them wait. Useful for testing and
/// development; data is lost when the process terminates.
pub struct InMemoryStore<E> {
    table: Arc<Mutex<Table>>,
    unique_fields: Arc<[String]>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for InMemoryStore<E> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
            unique_fields: Arc::clone(&self.unique_fields),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Debug for InMemoryStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("entity_type", &E::TYPE_NAME)
            .field("unique_fields", &self.unique_fields)
            .finish()
    }
}

impl<E: Entity> Default for InMemoryStore<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> InMemoryStore<E> {
    pub fn new() -> Self {
        Self::with_unique_fields(Vec::<String>::new())
    }

    /// Store that rejects writes duplicating any of the given fields with `Conflict`
    pub fn with_unique_fields(fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            table: Arc::new(Mutex::new(Table::default())),
            unique_fields: fields.into_iter().map(Into::into).collect(),
            _entity: PhantomData,
        }
    }

    pub async fn len(&self) -> usize {
        self.table.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryStore<E> {
    async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, DomainError> {
        self.table.lock().await.find_by_id::<E>(id)
    }

    async fn find_where(&self, conditions: &Conditions) -> Result<Vec<E>, DomainError> {
        self.table.lock().await.find_where::<E>(conditions)
    }

    async fn update_where(&self, conditions: &Conditions, patch: &Patch) -> Result<u64, DomainError> {
        self.table
            .lock()
            .await
            .update_where(&self.unique_fields, conditions, patch)
    }

    async fn delete_where(&self, conditions: &Conditions) -> Result<u64, DomainError> {
        Ok(self.table.lock().await.delete_where(conditions))
    }

    async fn insert(&self, data: Document) -> Result<E, DomainError> {
        self.table.lock().await.insert::<E>(&self.unique_fields, data)
    }
}

#[async_trait]
impl<E: Entity> TransactionManager for InMemoryStore<E> {
    type Tx = InMemoryTransaction<E>;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        let guard = Arc::clone(&self.table).lock_owned().await;
        let snapshot = Table::clone(&guard);

        debug!(entity_type = E::TYPE_NAME, "In-memory transaction started");

        Ok(InMemoryTransaction {
            state: Arc::new(Mutex::new(Some(TxState {
                guard,
                snapshot,
                committed: false,
            }))),
            unique_fields: Arc::clone(&self.unique_fields),
            _entity: PhantomData,
        })
    }
}

/// Exclusive hold on the table plus the pre-transaction copy
///
/// Dropping an uncommitted state restores the snapshot, so a transaction
/// abandoned without `commit` leaves no trace.
struct TxState {
    guard: OwnedMutexGuard<Table>,
    snapshot: Table,
    committed: bool,
}

impl Drop for TxState {
    fn drop(&mut self) {
        if !self.committed {
            *self.guard = std::mem::take(&mut self.snapshot);
        }
    }
}

/// Open transaction on an [`InMemoryStore`]
pub struct InMemoryTransaction<E> {
    state: Arc<Mutex<Option<TxState>>>,
    unique_fields: Arc<[String]>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for InMemoryTransaction<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            unique_fields: Arc::clone(&self.unique_fields),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> Debug for InMemoryTransaction<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemoryTransaction")
            .field("entity_type", &E::TYPE_NAME)
            .finish_non_exhaustive()
    }
}

fn finished() -> DomainError {
    DomainError::storage("Transaction already finished")
}

impl<E: Entity> InMemoryTransaction<E> {
    async fn with_table<T>(
        &self,
        f: impl FnOnce(&mut Table) -> Result<T, DomainError> + Send,
    ) -> Result<T, DomainError> {
        let mut state = self.state.lock().await;
        let state = state.as_mut().ok_or_else(finished)?;
        f(&mut *state.guard)
    }
}

#[async_trait]
impl<E: Entity> EntityStore<E> for InMemoryTransaction<E> {
    async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, DomainError> {
        self.with_table(|table| table.find_by_id::<E>(id)).await
    }

    async fn find_where(&self, conditions: &Conditions) -> Result<Vec<E>, DomainError> {
        self.with_table(|table| table.find_where::<E>(conditions)).await
    }

    async fn update_where(&self, conditions: &Conditions, patch: &Patch) -> Result<u64, DomainError> {
        let unique_fields = Arc::clone(&self.unique_fields);
        self.with_table(|table| table.update_where(&unique_fields, conditions, patch))
            .await
    }

    async fn delete_where(&self, conditions: &Conditions) -> Result<u64, DomainError> {
        self.with_table(|table| Ok(table.delete_where(conditions)))
            .await
    }

    async fn insert(&self, data: Document) -> Result<E, DomainError> {
        let unique_fields = Arc::clone(&self.unique_fields);
        self.with_table(|table| table.insert::<E>(&unique_fields, data))
            .await
    }
}

#[async_trait]
impl<E: Entity> Transaction for InMemoryTransaction<E> {
    async fn commit(&self) -> Result<(), DomainError> {
        let mut state = self.state.lock().await.take().ok_or_else(finished)?;
        state.committed = true;

        debug!(entity_type = E::TYPE_NAME, "In-memory transaction committed");
        Ok(())
    }

    async fn rollback(&self) -> Result<(), DomainError> {
        // Dropping the uncommitted state restores the snapshot
        drop(self.state.lock().await.take().ok_or_else(finished)?);

        debug!(entity_type = E::TYPE_NAME, "In-memory transaction rolled back");
        Ok(())
    }
}
