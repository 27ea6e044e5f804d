//! Redis cache implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client};
use tracing::debug;

use crate::domain::cache::{Cache, MAX_TTL};
use crate::domain::DomainError;

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Prefix shared by every key this cache writes
    pub key_prefix: Option<String>,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: None,
        }
    }
}

impl RedisCacheConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into()).filter(|p: &String| !p.is_empty());
        self
    }
}

fn prefixed(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, key),
        None => key.to_string(),
    }
}

/// Millisecond TTL for PSETEX; Redis rejects zero
fn ttl_millis(ttl: Duration) -> u64 {
    u64::try_from(ttl.min(MAX_TTL).as_millis())
        .unwrap_or(u64::MAX)
        .max(1)
}

fn cache_error(op: &str, key: &str, e: redis::RedisError) -> DomainError {
    DomainError::cache(format!("Redis {} failed for '{}': {}", op, key, e))
}

/// Shared cache backed by Redis
///
/// Single-key commands (`GET`, `PSETEX`, `DEL`) are atomic on the server,
/// so concurrent processes see whole entries or nothing.
#[derive(Clone)]
pub struct RedisCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisCache {
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        debug!(url = %config.url, prefix = ?config.key_prefix, "Connected to Redis cache");

        Ok(Self { connection, config })
    }

    fn prefix_key(&self, key: &str) -> String {
        prefixed(self.config.key_prefix.as_deref(), key)
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError> {
        let mut conn = self.connection.clone();

        conn.get(self.prefix_key(key))
            .await
            .map_err(|e| cache_error("GET", key, e))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        conn.pset_ex::<_, _, ()>(self.prefix_key(key), value, ttl_millis(ttl))
            .await
            .map_err(|e| cache_error("PSETEX", key, e))
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        let mut conn = self.connection.clone();

        let deleted: u32 = conn
            .del(self.prefix_key(key))
            .await
            .map_err(|e| cache_error("DEL", key, e))?;

        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Tests marked #[ignore] need a Redis server on localhost

    fn test_config() -> RedisCacheConfig {
        RedisCacheConfig::new("redis://127.0.0.1:6379").with_key_prefix("pmp-test")
    }

    #[test]
    fn test_prefixed_keys() {
        assert_eq!(
            prefixed(Some("app"), "model_cache:user:1"),
            "app:model_cache:user:1"
        );
        assert_eq!(prefixed(None, "model_cache:user:1"), "model_cache:user:1");
    }

    #[test]
    fn test_empty_prefix_is_ignored() {
        assert!(RedisCacheConfig::default().with_key_prefix("").key_prefix.is_none());
    }

    #[test]
    fn test_ttl_millis_never_zero() {
        assert_eq!(ttl_millis(Duration::ZERO), 1);
        assert_eq!(ttl_millis(Duration::from_micros(10)), 1);
        assert_eq!(ttl_millis(Duration::from_secs(600)), 600_000);
    }

    #[test]
    fn test_ttl_millis_clamps_huge_ttl() {
        let millis = ttl_millis(Duration::from_secs(u64::MAX));
        assert_eq!(millis, MAX_TTL.as_millis() as u64);
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_set_get_delete() {
        let cache = RedisCache::new(test_config()).await.unwrap();

        cache
            .set_raw("model_cache:note:1", "{\"id\":1}", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            cache.get_raw("model_cache:note:1").await.unwrap(),
            Some("{\"id\":1}".to_string())
        );

        assert!(cache.delete("model_cache:note:1").await.unwrap());
        assert!(!cache.delete("model_cache:note:1").await.unwrap());
    }

    #[tokio::test]
    #[ignore = "Requires running Redis instance"]
    async fn test_redis_ttl() {
        let cache = RedisCache::new(test_config()).await.unwrap();

        cache
            .set_raw("ttl_key", "1", Duration::from_secs(60))
            .await
            .unwrap();

        let mut conn = cache.connection.clone();
        let millis: i64 = conn.pttl(cache.prefix_key("ttl_key")).await.unwrap();
        assert!(millis > 50_000);

        assert!(cache.delete("ttl_key").await.unwrap());
        let millis: i64 = conn.pttl(cache.prefix_key("ttl_key")).await.unwrap();
        assert_eq!(millis, -2);
    }
}
