//! In-memory cache implementation using moka

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use moka::Expiry;

use crate::domain::cache::{Cache, MAX_TTL};
use crate::domain::DomainError;

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Serialized value plus the instant it stops being served
#[derive(Debug, Clone)]
struct CacheEntry {
    data: String,
    expires_at: Instant,
}

impl CacheEntry {
    fn remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at.checked_duration_since(now).filter(|d| !d.is_zero())
    }
}

/// Evicts each entry at its own absolute expiry
struct EntryExpiry;

impl Expiry<String, CacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.remaining(created_at).unwrap_or(Duration::ZERO))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.remaining(updated_at).unwrap_or(Duration::ZERO))
    }
}

/// Process-local cache with per-entry TTL and bounded capacity
///
/// Each `insert`/`remove` on the underlying moka cache is atomic per key,
/// which is the only guarantee the repository relies on.
#[derive(Debug, Clone)]
pub struct InMemoryCache {
    cache: MokaCache<String, CacheEntry>,
    config: InMemoryCacheConfig,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(EntryExpiry)
            .build();

        Self { cache, config }
    }

    pub fn config(&self) -> &InMemoryCacheConfig {
        &self.config
    }

    /// Returns the live entry for a key, dropping it if it has already expired
    async fn live_entry(&self, key: &str) -> Option<CacheEntry> {
        let entry = self.cache.get(key).await?;

        if entry.remaining(Instant::now()).is_none() {
            self.cache.remove(key).await;
            return None;
        }

        Some(entry)
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.live_entry(key).await.map(|entry| entry.data))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let expires_at = Instant::now()
            .checked_add(ttl.min(MAX_TTL))
            .ok_or_else(|| DomainError::cache(format!("TTL {ttl:?} for {key} is out of range")))?;

        let entry = CacheEntry {
            data: value.to_string(),
            expires_at,
        };

        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key).await.is_some())
    }
}
