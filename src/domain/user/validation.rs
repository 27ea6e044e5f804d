//! Rule sets for user input

use crate::domain::validation::{Rule, RuleSet};

pub const MAX_NAME_LENGTH: u64 = 255;
pub const MAX_EMAIL_LENGTH: u64 = 255;
pub const MIN_PASSWORD_LENGTH: u64 = 8;

/// Canonical form used wherever an email is stored or looked up
///
/// Addresses differing only in case or surrounding whitespace are one account.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Raw registration input: name, email and plain-text password
pub fn registration_rules() -> RuleSet {
    RuleSet::new()
        .field("name", [Rule::Required, Rule::String, Rule::Max(MAX_NAME_LENGTH)])
        .field("email", [Rule::Required, Rule::Email, Rule::Max(MAX_EMAIL_LENGTH)])
        .field("password", [Rule::Required, Rule::String, Rule::Min(MIN_PASSWORD_LENGTH)])
}

/// Login input
pub fn login_rules() -> RuleSet {
    RuleSet::new()
        .field("email", [Rule::Required, Rule::Email])
        .field("password", [Rule::Required, Rule::String])
}

/// The record handed to the store once the password is hashed
pub fn record_rules() -> RuleSet {
    RuleSet::new()
        .field("name", [Rule::Required, Rule::String, Rule::Max(MAX_NAME_LENGTH)])
        .field("email", [Rule::Required, Rule::Email, Rule::Max(MAX_EMAIL_LENGTH)])
        .field("password_hash", [Rule::Required, Rule::String])
        .field("roles", [Rule::Array])
        .field("permissions", [Rule::Array])
        .field("created_at", [Rule::String])
}

/// Renaming an existing user
pub fn rename_rules() -> RuleSet {
    RuleSet::new().field("name", [Rule::Required, Rule::String, Rule::Max(MAX_NAME_LENGTH)])
}
