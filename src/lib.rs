//! PMP Data Layer
//!
//! Cache-aside entity access for request handlers, with:
//! - Pluggable caches (moka, Redis) and stores (in-memory, PostgreSQL)
//! - Per-entity authorization policies checked on every fetch
//! - Conflict-retried transactional user registration

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use domain::{
    AuthorizationGate, Cache, Entity, EntityStore, FileVersion, FileVersionCatalog,
    FileVersionPolicy, RuleValidator, StaticRoleAssigner, TransactionManager, User, UserAccounts,
    UserPolicy, Validator,
};
use infrastructure::{
    cache::CacheFactory,
    file_version::FileVersionService,
    repository::{CacheAsideRepository, RepositoryConfig},
    store::{InMemoryStore, PostgresStore, StorageType},
    user::{Argon2Hasher, RegistrationService, UserService},
};
use tracing::info;

/// Services handed to the CLI and any embedding application
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserAccounts>,
    pub file_versions: Arc<dyn FileVersionCatalog>,
}

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let cache = CacheFactory::create(&config.cache.cache_config()?).await?;
    let gate = AuthorizationGate::new()
        .require_policy(config.authorization.require_policy)
        .with_policy::<User>(UserPolicy)
        .with_policy::<FileVersion>(FileVersionPolicy);

    let shared = SharedParts {
        cache,
        gate: Arc::new(gate),
        validator: Arc::new(RuleValidator::new()),
        repository: config.cache.repository_config()?,
    };

    let storage = config.storage.storage_type()?;
    info!(storage = %storage, cache = %config.cache.backend, "Creating application state");

    let state = match storage {
        StorageType::InMemory => build_state(
            config,
            &shared,
            InMemoryStore::<User>::with_unique_fields(["email"]),
            InMemoryStore::<FileVersion>::new(),
        ),
        StorageType::Postgres => {
            let pool = config.storage.postgres_config()?.connect().await?;

            let users = PostgresStore::<User>::new(pool.clone(), "users")?;
            users.ensure_table().await?;
            users.ensure_unique_index("email", true).await?;

            let file_versions = PostgresStore::<FileVersion>::new(pool, "file_versions")?;
            file_versions.ensure_table().await?;

            build_state(config, &shared, users, file_versions)
        }
    };

    Ok(state)
}

/// Collaborators every repository shares regardless of store backend
struct SharedParts {
    cache: Arc<dyn Cache>,
    gate: Arc<AuthorizationGate>,
    validator: Arc<dyn Validator>,
    repository: RepositoryConfig,
}

impl SharedParts {
    fn repository<E, S>(&self, store: S) -> Arc<CacheAsideRepository<E, S>>
    where
        E: Entity,
        S: EntityStore<E>,
    {
        Arc::new(CacheAsideRepository::new(
            store,
            Arc::clone(&self.cache),
            Arc::clone(&self.gate),
            Arc::clone(&self.validator),
            self.repository.clone(),
        ))
    }
}

fn build_state<U, F>(config: &AppConfig, shared: &SharedParts, users: U, file_versions: F) -> AppState
where
    U: EntityStore<User> + TransactionManager + 'static,
    U::Tx: EntityStore<User>,
    F: EntityStore<FileVersion> + 'static,
{
    let hasher = Arc::new(Argon2Hasher::new());
    let roles = Arc::new(StaticRoleAssigner::new(config.registration.default_grants()));

    let user_repository = shared.repository::<User, U>(users);
    let registration =
        RegistrationService::new(Arc::clone(&user_repository), hasher.clone(), roles.clone())
            .with_retry_policy(config.registration.retry_policy());
    let users = UserService::new(user_repository, hasher, roles).with_registration(registration);

    let file_versions = FileVersionService::new(shared.repository::<FileVersion, F>(file_versions));

    AppState {
        users: Arc::new(users),
        file_versions: Arc::new(file_versions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Actor, DomainError};
    use serde_json::json;

    #[tokio::test]
    async fn test_in_memory_state_round_trip() {
        let state = create_app_state().await.unwrap();

        let ada = state
            .users
            .register("Ada", "ada@example.com", "long enough")
            .await
            .unwrap();
        assert_eq!(ada.roles, vec!["user".to_string()]);

        let logged_in = state
            .users
            .authenticate("ada@example.com", "long enough")
            .await
            .unwrap();
        assert_eq!(logged_in, Some(ada.clone()));

        let shown = state
            .users
            .get_user(&Actor::new(ada.id.to_string()), &ada.id)
            .await
            .unwrap();
        assert_eq!(shown, ada);
    }

    #[tokio::test]
    async fn test_require_policy_denies_abstaining_policy() {
        let mut config = AppConfig::default();
        config.authorization.require_policy = true;
        let state = create_app_state_with_config(&config).await.unwrap();

        let version = state
            .file_versions
            .add_version(
                json!({
                    "file_id": "f-1",
                    "name": "a.txt",
                    "path": "/a",
                    "mime_type": "text/plain",
                    "size": 1,
                    "version_number": 1,
                })
                .as_object()
                .cloned()
                .unwrap(),
            )
            .await
            .unwrap();

        // FileVersionPolicy abstains on view, which the strict gate denies
        let result = state
            .file_versions
            .get_version(&Actor::new("viewer"), &version.id)
            .await;
        assert!(matches!(result, Err(DomainError::Unauthorized { .. })));
    }
}
