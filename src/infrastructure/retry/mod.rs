//! Retry infrastructure - Conflict-retried transactional execution

mod clock;
mod executor;
mod policy;

pub use clock::{Clock, TokioClock};
pub use executor::{RetryOutcome, TransactionalRetryExecutor};
pub use policy::{DelayPolicy, RetryAttempt, RetryPolicy};

#[cfg(test)]
pub use clock::mock;
