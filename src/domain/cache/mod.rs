//! Cache domain - Generic caching abstraction layer

mod key;
mod repository;

pub use key::{CacheKey, DEFAULT_NAMESPACE};
pub use repository::{Cache, MAX_TTL};

#[cfg(test)]
pub use repository::mock::{CacheOp, MockCache};
