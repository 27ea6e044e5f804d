//! User service for authentication and account management

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use super::password::PasswordHasher;
use super::registration::RegistrationService;
use crate::domain::authorization::Actor;
use crate::domain::store::{Conditions, Document, EntityStore, Patch, TransactionManager};
use crate::domain::user::{
    login_rules, normalize_email, rename_rules, RoleAssigner, User, UserAccounts, UserId,
    UserSummary,
};
use crate::domain::DomainError;
use crate::infrastructure::repository::CacheAsideRepository;

/// [`UserAccounts`] backed by a cache-aside repository
pub struct UserService<S> {
    repository: Arc<CacheAsideRepository<User, S>>,
    registration: RegistrationService<S>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<S> UserService<S>
where
    S: EntityStore<User> + TransactionManager,
    S::Tx: EntityStore<User>,
{
    pub fn new(
        repository: Arc<CacheAsideRepository<User, S>>,
        hasher: Arc<dyn PasswordHasher>,
        roles: Arc<dyn RoleAssigner>,
    ) -> Self {
        let registration =
            RegistrationService::new(Arc::clone(&repository), Arc::clone(&hasher), roles);

        Self {
            repository,
            registration,
            hasher,
        }
    }

    /// Replaces the registration service, e.g. to change its retry policy
    pub fn with_registration(mut self, registration: RegistrationService<S>) -> Self {
        self.registration = registration;
        self
    }

    pub fn repository(&self) -> &CacheAsideRepository<User, S> {
        &self.repository
    }
}

#[async_trait]
impl<S> UserAccounts for UserService<S>
where
    S: EntityStore<User> + TransactionManager + 'static,
    S::Tx: EntityStore<User>,
{
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, DomainError> {
        self.registration.register(name, email, password).await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserSummary>, DomainError> {
        let email = normalize_email(email);
        let input = Document::from_iter([
            ("email".to_string(), json!(email)),
            ("password".to_string(), json!(password)),
        ]);
        self.repository
            .validator()
            .validate(&input, &login_rules())
            .map_err(|errors| DomainError::invalid_input(errors.first_message()))?;

        let matches = self
            .repository
            .store()
            .find_where(&Conditions::new().eq("email", email.as_str()))
            .await?;

        let Some(user) = matches.into_iter().next() else {
            debug!("Login for unknown email");
            return Ok(None);
        };

        if !self.hasher.verify(password, user.password_hash()) {
            debug!(user_id = %user.id(), "Login with wrong password");
            return Ok(None);
        }

        info!(user_id = %user.id(), "User authenticated");
        Ok(Some(user.summary()))
    }

    async fn get_user(&self, actor: &Actor, id: &UserId) -> Result<UserSummary, DomainError> {
        let user = self.repository.fetch_by_id_with_auth(id, actor, "view").await?;
        Ok(user.summary())
    }

    async fn rename_user(
        &self,
        actor: &Actor,
        id: &UserId,
        name: &str,
    ) -> Result<UserSummary, DomainError> {
        let user = self
            .repository
            .fetch_by_id_with_auth(id, actor, "update")
            .await?;

        let input = Document::from_iter([("name".to_string(), json!(name))]);
        let validated = self
            .repository
            .validator()
            .validate(&input, &rename_rules())
            .map_err(|errors| DomainError::invalid_input(errors.first_message()))?;

        let patch = Patch::from(validated);
        let current_name = Conditions::new().eq("name", user.name());
        self.repository
            .update_with_conditions(&user, &patch, &current_name)
            .await?;

        info!(user_id = %id, actor = %actor, "User renamed");

        let mut summary = user.summary();
        summary.name = name.to_string();
        Ok(summary)
    }

    async fn delete_user(&self, actor: &Actor, id: &UserId) -> Result<(), DomainError> {
        let user = self
            .repository
            .fetch_by_id_with_auth(id, actor, "delete")
            .await?;

        self.repository.delete_with_cache_invalidation(&user).await?;

        info!(user_id = %id, actor = %actor, "User deleted");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, DomainError> {
        let mut users = self.repository.store().find_where(&Conditions::new()).await?;
        users.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.email().cmp(b.email()))
        });

        Ok(users.iter().map(User::summary).collect())
    }
}
