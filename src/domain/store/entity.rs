//! Entity traits and document helpers

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Field every stored document carries its identifier under
pub const ID_FIELD: &str = "id";

/// JSON object form of an entity, as persisted by the stores
pub type Document = Map<String, Value>;

/// Trait for types that identify an entity
pub trait EntityId:
    Clone + Debug + Display + Send + Sync + Eq + Hash + Serialize + DeserializeOwned + 'static
{
    /// Produces a fresh identifier for a newly inserted entity
    fn generate() -> Self;
}

impl EntityId for uuid::Uuid {
    fn generate() -> Self {
        uuid::Uuid::new_v4()
    }
}

/// Trait for records managed by an entity store and cached by id
pub trait Entity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Stable type name, part of every cache key. Must not contain ':'.
    const TYPE_NAME: &'static str;

    /// The identifier type for this entity
    type Id: EntityId;

    /// Returns the entity's identifier
    fn id(&self) -> &Self::Id;
}

/// Serializes an entity into its document form
pub fn to_document<E: Serialize>(entity: &E) -> Result<Document, DomainError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(DomainError::internal("Entity did not serialize to an object")),
        Err(e) => Err(DomainError::internal(format!(
            "Failed to serialize entity: {}",
            e
        ))),
    }
}

/// Materializes an entity from its document form
pub fn from_document<E: Entity>(document: Document) -> Result<E, DomainError> {
    serde_json::from_value(Value::Object(document)).map_err(|e| {
        DomainError::storage(format!(
            "Failed to materialize {} document: {}",
            E::TYPE_NAME,
            e
        ))
    })
}

/// Converts an identifier into the JSON value stored under [`ID_FIELD`]
pub fn id_value<I: EntityId>(id: &I) -> Result<Value, DomainError> {
    serde_json::to_value(id)
        .map_err(|e| DomainError::internal(format!("Failed to serialize id '{}': {}", id, e)))
}
