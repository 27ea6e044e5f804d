//! Authorization gate

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use super::policy::{Actor, Policy, PolicyDecision};
use crate::domain::store::Entity;
use crate::domain::DomainError;

/// Result of one authorization check; computed per call, never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub actor: String,
    pub entity_type: &'static str,
    pub action: String,
    pub allowed: bool,
    pub reason: String,
}

impl AuthorizationDecision {
    /// Converts a denial into [`DomainError::Unauthorized`]
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.allowed {
            Ok(())
        } else {
            Err(DomainError::unauthorized(
                self.actor,
                self.entity_type,
                self.action,
            ))
        }
    }
}

/// Registry of per-entity-type policies
///
/// Entity types without a registered policy, and actions a policy abstains
/// on, are allowed unless `require_policy` is set.
#[derive(Clone, Default)]
pub struct AuthorizationGate {
    // Each value is an `Arc<dyn Policy<E>>` keyed by `TypeId::of::<E>()`
    policies: HashMap<TypeId, Arc<dyn Any + Send + Sync>>,
    require_policy: bool,
}

impl fmt::Debug for AuthorizationGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthorizationGate")
            .field("policies", &self.policies.len())
            .field("require_policy", &self.require_policy)
            .finish()
    }
}

impl AuthorizationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_policy(mut self, require: bool) -> Self {
        self.require_policy = require;
        self
    }

    pub fn requires_policy(&self) -> bool {
        self.require_policy
    }

    /// Builder form of [`register`](Self::register)
    pub fn with_policy<E: Entity>(mut self, policy: impl Policy<E> + 'static) -> Self {
        self.register::<E>(policy);
        self
    }

    /// Registers the policy for `E`, replacing any previous one
    pub fn register<E: Entity>(&mut self, policy: impl Policy<E> + 'static) {
        let policy: Arc<dyn Policy<E>> = Arc::new(policy);
        self.policies.insert(TypeId::of::<E>(), Arc::new(policy));
    }

    pub fn policy_for<E: Entity>(&self) -> Option<Arc<dyn Policy<E>>> {
        self.policies
            .get(&TypeId::of::<E>())
            .and_then(|p| p.downcast_ref::<Arc<dyn Policy<E>>>())
            .cloned()
    }

    pub fn check<E: Entity>(&self, actor: &Actor, action: &str, entity: &E) -> AuthorizationDecision {
        let decision = match self.policy_for::<E>() {
            Some(policy) => policy.decide(actor, action, entity),
            None => PolicyDecision::Abstain,
        };

        let (allowed, reason) = match decision {
            PolicyDecision::Allow => (true, "allowed by policy".to_string()),
            PolicyDecision::Deny(reason) => (false, reason),
            PolicyDecision::Abstain if self.require_policy => {
                (false, format!("no policy rule for '{}'", action))
            }
            PolicyDecision::Abstain => (true, "no applicable policy".to_string()),
        };

        debug!(
            actor = %actor,
            entity_type = E::TYPE_NAME,
            action = action,
            allowed = allowed,
            reason = %reason,
            "Authorization checked"
        );

        AuthorizationDecision {
            actor: actor.id().to_string(),
            entity_type: E::TYPE_NAME,
            action: action.to_string(),
            allowed,
            reason,
        }
    }
}
