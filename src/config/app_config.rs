use std::time::Duration;

use serde::Deserialize;

use crate::domain::cache::MAX_TTL;
use crate::domain::user::DefaultGrants;
use crate::domain::DomainError;
use crate::infrastructure::cache::{CacheConfig, CacheType};
use crate::infrastructure::repository::RepositoryConfig;
use crate::infrastructure::retry::{DelayPolicy, RetryPolicy};
use crate::infrastructure::store::{PostgresConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: CacheSettings,
    pub storage: StorageSettings,
    pub authorization: AuthorizationSettings,
    pub registration: RegistrationSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// `in_memory` or `redis`
    pub backend: String,
    pub redis_url: Option<String>,
    pub key_prefix: Option<String>,
    pub namespace: String,
    pub ttl_secs: u64,
    pub max_capacity: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            redis_url: None,
            key_prefix: None,
            namespace: crate::domain::cache::DEFAULT_NAMESPACE.to_string(),
            ttl_secs: 600,
            max_capacity: 10_000,
        }
    }
}

impl CacheSettings {
    pub fn cache_config(&self) -> Result<CacheConfig, DomainError> {
        let config = match self.backend.parse::<CacheType>()? {
            CacheType::InMemory => CacheConfig::in_memory(),
            CacheType::Redis => {
                let url = self.redis_url.as_deref().ok_or_else(|| {
                    DomainError::configuration("cache.redis_url is required for the redis backend")
                })?;
                CacheConfig::redis(url)
            }
        };

        let config = config.with_max_capacity(self.max_capacity);

        Ok(match &self.key_prefix {
            Some(prefix) => config.with_key_prefix(prefix.clone()),
            None => config,
        })
    }

    pub fn repository_config(&self) -> Result<RepositoryConfig, DomainError> {
        let ttl = Duration::from_secs(self.ttl_secs);
        if ttl.is_zero() || ttl > MAX_TTL {
            return Err(DomainError::configuration(format!(
                "cache.ttl_secs must be between 1 and {}, got {}",
                MAX_TTL.as_secs(),
                self.ttl_secs
            )));
        }

        Ok(RepositoryConfig::default()
            .with_ttl(ttl)
            .with_namespace(self.namespace.clone()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// `in_memory` or `postgres`
    pub backend: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: "in_memory".to_string(),
            database_url: None,
            max_connections: 10,
        }
    }
}

impl StorageSettings {
    pub fn storage_type(&self) -> Result<StorageType, DomainError> {
        self.backend.parse()
    }

    /// Connection settings; `DATABASE_URL` is used when no URL is configured
    pub fn postgres_config(&self) -> Result<PostgresConfig, DomainError> {
        let url = match &self.database_url {
            Some(url) => url.clone(),
            None => std::env::var("DATABASE_URL").map_err(|_| {
                DomainError::configuration(
                    "storage.database_url or DATABASE_URL is required for the postgres backend",
                )
            })?,
        };

        Ok(PostgresConfig::new(url).with_max_connections(self.max_connections))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuthorizationSettings {
    /// Deny entity types that have no registered policy
    pub require_policy: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationSettings {
    pub max_attempts: u32,
    pub delay_ms: u64,
    pub overall_timeout_ms: Option<u64>,
    pub default_roles: Vec<String>,
    pub default_permissions: Vec<String>,
}

impl Default for RegistrationSettings {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 1000,
            overall_timeout_ms: None,
            default_roles: vec!["user".to_string()],
            default_permissions: vec!["files.read".to_string(), "files.write".to_string()],
        }
    }
}

impl RegistrationSettings {
    pub fn retry_policy(&self) -> RetryPolicy {
        let policy = RetryPolicy::new(self.max_attempts)
            .with_delay(DelayPolicy::Fixed(Duration::from_millis(self.delay_ms)));

        match self.overall_timeout_ms {
            Some(ms) => policy.with_overall_timeout(Duration::from_millis(ms)),
            None => policy,
        }
    }

    pub fn default_grants(&self) -> DefaultGrants {
        DefaultGrants::new(
            self.default_roles.iter().cloned(),
            self.default_permissions.iter().cloned(),
        )
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("registration.default_roles")
                    .with_list_parse_key("registration.default_permissions")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
