//! Infrastructure layer - Store, cache and service implementations

pub mod cache;
pub mod file_version;
pub mod logging;
pub mod repository;
pub mod retry;
pub mod store;
pub mod user;
