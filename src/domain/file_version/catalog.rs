//! File version operations

use async_trait::async_trait;

use super::entity::{FileVersion, FileVersionId};
use crate::domain::authorization::Actor;
use crate::domain::store::Document;
use crate::domain::DomainError;

#[async_trait]
pub trait FileVersionCatalog: Send + Sync {
    /// Validates and stores a new version
    async fn add_version(&self, input: Document) -> Result<FileVersion, DomainError>;

    async fn get_version(&self, actor: &Actor, id: &FileVersionId)
        -> Result<FileVersion, DomainError>;

    /// Points the version at new content, bumping `version_number`
    ///
    /// Fails with `NotFound` if the version changed since it was read.
    async fn replace_content(
        &self,
        actor: &Actor,
        id: &FileVersionId,
        path: &str,
        size: u64,
    ) -> Result<FileVersion, DomainError>;

    async fn delete_version(&self, actor: &Actor, id: &FileVersionId) -> Result<(), DomainError>;

    /// Drops cached copies without touching stored versions
    async fn forget(&self, ids: &[FileVersionId]);
}
