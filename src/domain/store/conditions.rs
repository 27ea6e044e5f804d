//! Field-equality conditions and partial updates applied to documents

use serde_json::{Map, Value};

use super::entity::{id_value, Document, EntityId, ID_FIELD};
use crate::domain::DomainError;

/// Conjunction of `field = value` predicates
///
/// An empty set of conditions matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    predicates: Vec<(String, Value)>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Matches the document whose identifier equals `id`
    pub fn for_id<I: EntityId>(id: &I) -> Result<Self, DomainError> {
        Ok(Self::new().eq(ID_FIELD, id_value(id)?))
    }

    /// Adds an equality predicate
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push((field.into(), value.into()));
        self
    }

    /// Combines two condition sets with AND
    pub fn and(mut self, other: &Conditions) -> Self {
        self.predicates.extend(other.predicates.iter().cloned());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.predicates.iter().map(|(f, v)| (f.as_str(), v))
    }

    /// Whether every predicate holds for the document
    pub fn matches(&self, document: &Document) -> bool {
        self.predicates
            .iter()
            .all(|(field, value)| document.get(field) == Some(value))
    }

    /// Renders the conditions as a single JSON object for containment queries
    ///
    /// Returns `None` when two predicates require different values for the
    /// same field, in which case nothing can match.
    pub fn to_object(&self) -> Option<Value> {
        let mut object = Map::new();

        for (field, value) in &self.predicates {
            match object.get(field) {
                Some(existing) if existing != value => return None,
                _ => {
                    object.insert(field.clone(), value.clone());
                }
            }
        }

        Some(Value::Object(object))
    }
}

/// Set of field assignments applied by a conditional update
///
/// The identifier field is never written by a patch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    fields: Map<String, Value>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        let field = field.into();

        if field != ID_FIELD {
            self.fields.insert(field, value.into());
        }

        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn apply(&self, document: &mut Document) {
        for (field, value) in &self.fields {
            document.insert(field.clone(), value.clone());
        }
    }
}

impl From<Map<String, Value>> for Patch {
    fn from(mut fields: Map<String, Value>) -> Self {
        fields.remove(ID_FIELD);
        Self { fields }
    }
}
