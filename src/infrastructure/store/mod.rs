//! Store infrastructure - Entity store implementations

mod in_memory;
mod postgres;

pub use in_memory::{InMemoryStore, InMemoryTransaction};
pub use postgres::{PostgresConfig, PostgresStore, PostgresTransaction};

use serde_json::Value;

use crate::domain::DomainError;

/// Supported store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageType {
    /// In-memory store (for testing/development)
    #[default]
    InMemory,
    /// PostgreSQL store
    Postgres,
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage backend: {}. Valid backends: in_memory, postgres",
                s
            ))),
        }
    }
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageType::InMemory => write!(f, "in_memory"),
            StorageType::Postgres => write!(f, "postgres"),
        }
    }
}

/// Primary key column value for a serialized id
pub(crate) fn storage_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
