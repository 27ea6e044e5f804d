//! Cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Longest TTL a cache entry may carry; larger values are clamped by backends
pub const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Key-value cache with per-entry TTL
///
/// Every operation is atomic per key. Values are JSON strings so the trait
/// stays dyn-compatible.
#[async_trait]
pub trait Cache: Send + Sync + Debug {
    /// Gets a raw JSON value from the cache
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw JSON value in the cache with a TTL
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError>;

    /// Deletes a value from the cache, returning whether it was present
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;
}
