//! Repository infrastructure - Cache-aside access to entity stores

mod cache_aside;

pub use cache_aside::{CacheAsideRepository, RepositoryConfig};
