//! File version domain

mod catalog;
mod entity;
mod policy;
mod validation;

pub use catalog::FileVersionCatalog;
pub use entity::{FileVersion, FileVersionId};
pub use policy::{FileVersionPolicy, EDITOR_ROLE};
pub use validation::file_version_rules;
