//! User account operations

use async_trait::async_trait;

use super::entity::{UserId, UserSummary};
use crate::domain::authorization::Actor;
use crate::domain::DomainError;

/// Account operations exposed to request handlers and the CLI
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Creates an account with a unique email and default grants
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<UserSummary, DomainError>;

    /// Checks credentials; `None` when the email is unknown or the password is wrong
    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<UserSummary>, DomainError>;

    async fn get_user(&self, actor: &Actor, id: &UserId) -> Result<UserSummary, DomainError>;

    async fn rename_user(
        &self,
        actor: &Actor,
        id: &UserId,
        name: &str,
    ) -> Result<UserSummary, DomainError>;

    async fn delete_user(&self, actor: &Actor, id: &UserId) -> Result<(), DomainError>;

    async fn list_users(&self) -> Result<Vec<UserSummary>, DomainError>;
}
