//! User domain
//!
//! User records, the rules their input is validated against, the access
//! policy guarding them, and the account operations built on top.

mod accounts;
mod entity;
mod policy;
mod roles;
mod validation;

pub use accounts::UserAccounts;
pub use entity::{User, UserId, UserSummary};
pub use policy::{UserPolicy, ADMIN_ROLE};
pub use roles::{DefaultGrants, RoleAssigner, StaticRoleAssigner};
pub use validation::{
    login_rules, normalize_email, record_rules, registration_rules, rename_rules,
    MAX_EMAIL_LENGTH, MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};

#[cfg(test)]
pub use roles::MockRoleAssigner;
