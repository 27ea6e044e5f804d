//! Entity store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use super::conditions::{Conditions, Patch};
use super::entity::{Document, Entity};
use crate::domain::DomainError;

/// Durable source of truth for one entity type
///
/// Implemented both by stores and by their open transactions, so the same
/// operations can run inside or outside a transaction boundary.
#[async_trait]
pub trait EntityStore<E>: Send + Sync + Debug
where
    E: Entity,
{
    /// Loads an entity by its identifier
    async fn find_by_id(&self, id: &E::Id) -> Result<Option<E>, DomainError>;

    /// Loads every entity matching the conditions
    async fn find_where(&self, conditions: &Conditions) -> Result<Vec<E>, DomainError>;

    /// Checks whether any entity matches the conditions
    async fn exists_where(&self, conditions: &Conditions) -> Result<bool, DomainError> {
        Ok(!self.find_where(conditions).await?.is_empty())
    }

    /// Applies the patch to every matching entity, returning the matched count
    async fn update_where(&self, conditions: &Conditions, patch: &Patch)
        -> Result<u64, DomainError>;

    /// Deletes every matching entity, returning the matched count
    async fn delete_where(&self, conditions: &Conditions) -> Result<u64, DomainError>;

    /// Inserts validated data under a freshly generated identifier
    async fn insert(&self, data: Document) -> Result<E, DomainError>;
}
