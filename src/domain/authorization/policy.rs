//! Actors and per-entity policies

use std::collections::HashSet;
use std::fmt::{self, Debug};

use crate::domain::store::Entity;

/// The caller on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    id: String,
    roles: HashSet<String>,
}

impl Actor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: HashSet::new(),
        }
    }

    /// Actor used by internal callers such as the CLI
    pub fn system() -> Self {
        Self::new("system").with_role("admin")
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }

    pub fn with_roles(mut self, roles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.roles.extend(roles.into_iter().map(Into::into));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

/// What a policy says about one (actor, action, entity) triple
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow,
    Deny(String),
    /// The policy has no rule for this action
    Abstain,
}

impl PolicyDecision {
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Deny(reason.into())
    }
}

/// Authorization rules for one entity type
pub trait Policy<E: Entity>: Send + Sync {
    fn decide(&self, actor: &Actor, action: &str, entity: &E) -> PolicyDecision;
}

/// Adapts a closure into a [`Policy`]
pub struct FnPolicy<F>(F);

impl<F> FnPolicy<F> {
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Debug for FnPolicy<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPolicy").finish_non_exhaustive()
    }
}

impl<E, F> Policy<E> for FnPolicy<F>
where
    E: Entity,
    F: Fn(&Actor, &str, &E) -> PolicyDecision + Send + Sync,
{
    fn decide(&self, actor: &Actor, action: &str, entity: &E) -> PolicyDecision {
        (self.0)(actor, action, entity)
    }
}
