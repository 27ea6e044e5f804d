//! Transactional retry executor

use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use super::clock::{Clock, TokioClock};
use super::policy::{RetryAttempt, RetryPolicy};
use crate::domain::store::{TransactionManager, TransactionScope};
use crate::domain::DomainError;

/// Result of a run plus the per-attempt history
#[derive(Debug)]
pub struct RetryOutcome<T> {
    pub result: Result<T, DomainError>,
    pub attempts: Vec<RetryAttempt>,
}

/// Runs units of work in store transactions, retrying on conflict
///
/// Every attempt opens a fresh transaction and calls the unit again from
/// the top, so nothing read in one attempt is reused by the next. Only
/// [`DomainError::Conflict`] is retried.
#[derive(Debug, Clone)]
pub struct TransactionalRetryExecutor {
    clock: Arc<dyn Clock>,
}

impl Default for TransactionalRetryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionalRetryExecutor {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(TokioClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    pub async fn run<M, T, F, Fut>(
        &self,
        manager: &M,
        policy: &RetryPolicy,
        unit: F,
    ) -> Result<T, DomainError>
    where
        M: TransactionManager,
        F: FnMut(TransactionScope<M::Tx>) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        self.run_recorded(manager, policy, unit).await.result
    }

    pub async fn run_recorded<M, T, F, Fut>(
        &self,
        manager: &M,
        policy: &RetryPolicy,
        mut unit: F,
    ) -> RetryOutcome<T>
    where
        M: TransactionManager,
        F: FnMut(TransactionScope<M::Tx>) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let started = self.clock.now();
        let max_attempts = policy.max_attempts.max(1);
        let mut attempts = Vec::new();

        for attempt in 1..=max_attempts {
            let error = match self.attempt_once(manager, &mut unit).await {
                Ok(value) => {
                    attempts.push(RetryAttempt {
                        attempt,
                        conflict: false,
                        delay: None,
                    });
                    return RetryOutcome {
                        result: Ok(value),
                        attempts,
                    };
                }
                Err(error) => error,
            };

            if !error.is_conflict() {
                attempts.push(RetryAttempt {
                    attempt,
                    conflict: false,
                    delay: None,
                });
                return RetryOutcome {
                    result: Err(error),
                    attempts,
                };
            }

            if attempt == max_attempts {
                attempts.push(RetryAttempt {
                    attempt,
                    conflict: true,
                    delay: None,
                });
                break;
            }

            let delay = policy.delay.delay_for_attempt(attempt);

            if let Some(timeout) = policy.overall_timeout {
                let elapsed = self.clock.now().saturating_duration_since(started);

                if elapsed + delay > timeout {
                    warn!(attempt, ?elapsed, ?timeout, "Retry budget exhausted by timeout");
                    attempts.push(RetryAttempt {
                        attempt,
                        conflict: true,
                        delay: None,
                    });
                    return RetryOutcome {
                        result: Err(DomainError::retry_timeout(attempt)),
                        attempts,
                    };
                }
            }

            warn!(attempt, max_attempts, ?delay, error = %error, "Transaction conflicted, retrying");
            attempts.push(RetryAttempt {
                attempt,
                conflict: true,
                delay: Some(delay),
            });

            self.clock.sleep(delay).await;
        }

        warn!(max_attempts, "Giving up after repeated transaction conflicts");

        RetryOutcome {
            result: Err(DomainError::retry_exhausted(max_attempts)),
            attempts,
        }
    }

    async fn attempt_once<M, T, F, Fut>(&self, manager: &M, unit: &mut F) -> Result<T, DomainError>
    where
        M: TransactionManager,
        F: FnMut(TransactionScope<M::Tx>) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let scope = TransactionScope::new(manager.begin().await?);

        match unit(scope.clone()).await {
            Ok(value) => {
                scope.commit().await?;
                debug!("Transaction committed");
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = scope.rollback().await {
                    warn!(error = %rollback_error, "Rollback failed");
                }
                Err(error)
            }
        }
    }
}
