//! Domain layer - Entities, collaborator traits and the rules they follow

pub mod authorization;
pub mod cache;
pub mod error;
pub mod file_version;
pub mod store;
pub mod user;
pub mod validation;

pub use authorization::{
    Actor, AuthorizationDecision, AuthorizationGate, FnPolicy, Policy, PolicyDecision,
};
pub use cache::{Cache, CacheKey, DEFAULT_NAMESPACE, MAX_TTL};
pub use error::DomainError;
pub use file_version::{FileVersion, FileVersionCatalog, FileVersionId, FileVersionPolicy};
pub use store::{
    Conditions, Document, Entity, EntityId, EntityStore, Patch, Transaction, TransactionManager,
    TransactionScope,
};
pub use user::{
    DefaultGrants, RoleAssigner, StaticRoleAssigner, User, UserAccounts, UserId, UserPolicy,
    UserSummary,
};
pub use validation::{FieldError, FieldErrors, Rule, RuleSet, RuleValidator, Validator};
