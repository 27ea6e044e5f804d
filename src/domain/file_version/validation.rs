//! Rule sets for file version input

use crate::domain::validation::{Rule, RuleSet};

/// A new file version as submitted by a client
pub fn file_version_rules() -> RuleSet {
    RuleSet::new()
        .field("file_id", [Rule::Required, Rule::String, Rule::Max(64)])
        .field("name", [Rule::Required, Rule::String, Rule::Max(255)])
        .field("path", [Rule::Required, Rule::String, Rule::Max(1024)])
        .field("mime_type", [Rule::Required, Rule::String, Rule::Max(127)])
        .field("size", [Rule::Required, Rule::Integer, Rule::Min(0)])
        .field("version_number", [Rule::Required, Rule::Integer, Rule::Min(1)])
}
