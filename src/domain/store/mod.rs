//! Store domain - Generic persistence abstraction with transactions

mod conditions;
mod entity;
mod repository;
mod transaction;

pub use conditions::{Conditions, Patch};
pub use entity::{from_document, id_value, to_document, Document, Entity, EntityId, ID_FIELD};
pub use repository::EntityStore;
pub use transaction::{CommitHook, Transaction, TransactionManager, TransactionScope};

#[cfg(test)]
pub use entity::fixtures;
#[cfg(test)]
pub use transaction::mock;
