//! File version entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::store::{Entity, EntityId};

/// File version identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileVersionId(Uuid);

impl FileVersionId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }
}

impl EntityId for FileVersionId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::str::FromStr for FileVersionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl std::fmt::Display for FileVersionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stored revision of a file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileVersion {
    pub id: FileVersionId,
    pub file_id: String,
    pub name: String,
    pub path: String,
    pub mime_type: String,
    pub size: u64,
    pub version_number: u32,
}

impl FileVersion {
    /// Field holding the revision counter, used for optimistic updates
    pub const VERSION_FIELD: &'static str = "version_number";
}

impl Entity for FileVersion {
    const TYPE_NAME: &'static str = "file_version";
    type Id = FileVersionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
