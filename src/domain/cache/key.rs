//! Structured cache keys for entities

use std::fmt;

use crate::domain::store::Entity;

/// Default namespace prepended to every entity cache key
pub const DEFAULT_NAMESPACE: &str = "model_cache";

/// Cache key composed of an entity type name and an entity identifier
///
/// Renders as `{namespace}:{entity_type}:{id}`. Because the type name is
/// always a separate segment, equal ids of different entity types never
/// share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: String,
    entity_type: &'static str,
    id: String,
}

impl CacheKey {
    /// Creates a key for the given entity type and id in the default namespace
    pub fn new(entity_type: &'static str, id: impl fmt::Display) -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE, entity_type, id)
    }

    /// Creates a key in an explicit namespace
    pub fn with_namespace(
        namespace: impl Into<String>,
        entity_type: &'static str,
        id: impl fmt::Display,
    ) -> Self {
        debug_assert!(
            !entity_type.contains(':'),
            "entity type names must not contain ':'"
        );

        Self {
            namespace: namespace.into(),
            entity_type,
            id: id.to_string(),
        }
    }

    /// Creates the key for an entity of type `E`
    pub fn for_entity<E: Entity>(namespace: &str, id: &E::Id) -> Self {
        Self::with_namespace(namespace, E::TYPE_NAME, id)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The string form used against the key-value cache
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.entity_type, self.id)
    }
}
