//! File version catalog over the cache-aside repository

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::authorization::Actor;
use crate::domain::file_version::{
    file_version_rules, FileVersion, FileVersionCatalog, FileVersionId,
};
use crate::domain::store::{Conditions, Document, EntityStore, Patch};
use crate::domain::DomainError;
use crate::infrastructure::repository::CacheAsideRepository;

/// [`FileVersionCatalog`] with optimistic concurrency on `version_number`
#[derive(Debug)]
pub struct FileVersionService<S> {
    repository: Arc<CacheAsideRepository<FileVersion, S>>,
}

impl<S> FileVersionService<S>
where
    S: EntityStore<FileVersion>,
{
    pub fn new(repository: Arc<CacheAsideRepository<FileVersion, S>>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<S> FileVersionCatalog for FileVersionService<S>
where
    S: EntityStore<FileVersion> + 'static,
{
    async fn add_version(&self, input: Document) -> Result<FileVersion, DomainError> {
        let version = self
            .repository
            .create_with_validation(&input, &file_version_rules())
            .await?;

        info!(
            file_version_id = %version.id,
            file_id = %version.file_id,
            version_number = version.version_number,
            "File version added"
        );
        Ok(version)
    }

    async fn get_version(
        &self,
        actor: &Actor,
        id: &FileVersionId,
    ) -> Result<FileVersion, DomainError> {
        self.repository.fetch_by_id_with_auth(id, actor, "view").await
    }

    async fn replace_content(
        &self,
        actor: &Actor,
        id: &FileVersionId,
        path: &str,
        size: u64,
    ) -> Result<FileVersion, DomainError> {
        let current = self
            .repository
            .fetch_by_id_with_auth(id, actor, "update")
            .await?;

        let next_number = current.version_number + 1;
        let patch = Patch::new()
            .set("path", path)
            .set("size", size)
            .set(FileVersion::VERSION_FIELD, next_number);
        let unchanged = Conditions::new().eq(FileVersion::VERSION_FIELD, current.version_number);

        self.repository
            .update_with_conditions(&current, &patch, &unchanged)
            .await?;

        Ok(FileVersion {
            path: path.to_string(),
            size,
            version_number: next_number,
            ..current
        })
    }

    async fn delete_version(&self, actor: &Actor, id: &FileVersionId) -> Result<(), DomainError> {
        let version = self
            .repository
            .fetch_by_id_with_auth(id, actor, "delete")
            .await?;

        self.repository
            .delete_with_cache_invalidation(&version)
            .await?;
        Ok(())
    }

    async fn forget(&self, ids: &[FileVersionId]) {
        self.repository.remove_cache_for_ids(ids).await;
    }
}
