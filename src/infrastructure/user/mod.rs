//! User infrastructure module
//!
//! Password hashing with Argon2, conflict-retried registration, and the
//! account service built on the cache-aside repository.

mod password;
mod registration;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use registration::RegistrationService;
pub use service::UserService;

#[cfg(test)]
pub use password::mock::PlainHasher;
