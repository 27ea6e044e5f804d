//! Cache factory for runtime selection

use std::sync::Arc;

use tracing::info;

use crate::domain::cache::Cache;
use crate::domain::DomainError;

use super::in_memory::{InMemoryCache, InMemoryCacheConfig};
use super::redis::{RedisCache, RedisCacheConfig};

/// Supported cache backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheType {
    /// Process-local cache using moka
    #[default]
    InMemory,
    /// Shared Redis cache
    Redis,
}

impl std::fmt::Display for CacheType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheType::InMemory => write!(f, "in_memory"),
            CacheType::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for CacheType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(CacheType::InMemory),
            "redis" => Ok(CacheType::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown cache type: {}. Valid types: in_memory, redis",
                s
            ))),
        }
    }
}

/// Backend selection and connection settings
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub cache_type: CacheType,
    /// Required for [`CacheType::Redis`]
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    /// In-memory backend only
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::InMemory,
            redis_url: None,
            key_prefix: None,
            max_capacity: 10_000,
        }
    }
}

impl CacheConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            cache_type: CacheType::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Builds the configured cache backend
#[derive(Debug, Default)]
pub struct CacheFactory;

impl CacheFactory {
    pub async fn create(config: &CacheConfig) -> Result<Arc<dyn Cache>, DomainError> {
        info!(backend = %config.cache_type, "Creating cache");

        match config.cache_type {
            CacheType::InMemory => Ok(Arc::new(InMemoryCache::with_config(
                InMemoryCacheConfig::default().with_max_capacity(config.max_capacity),
            ))),
            CacheType::Redis => {
                let url = config.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for Redis cache type")
                })?;

                let mut redis_config = RedisCacheConfig::new(url);

                if let Some(prefix) = &config.key_prefix {
                    redis_config = redis_config.with_key_prefix(prefix.clone());
                }

                Ok(Arc::new(RedisCache::new(redis_config).await?))
            }
        }
    }
}
