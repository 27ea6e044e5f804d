//! Access rules for file versions

use super::entity::FileVersion;
use crate::domain::authorization::{Actor, Policy, PolicyDecision};
use crate::domain::user::ADMIN_ROLE;

pub const EDITOR_ROLE: &str = "editor";

/// Editors and admins may change file versions; viewing is left to the gate default
#[derive(Debug, Clone, Copy, Default)]
pub struct FileVersionPolicy;

impl Policy<FileVersion> for FileVersionPolicy {
    fn decide(&self, actor: &Actor, action: &str, _version: &FileVersion) -> PolicyDecision {
        match action {
            "update" | "delete" if actor.has_role(EDITOR_ROLE) || actor.has_role(ADMIN_ROLE) => {
                PolicyDecision::Allow
            }
            "update" | "delete" => PolicyDecision::deny("editor role required"),
            _ => PolicyDecision::Abstain,
        }
    }
}
