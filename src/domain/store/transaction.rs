//! Transaction boundary traits

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokio::sync::Mutex;

use crate::domain::DomainError;

/// Work scheduled to run once a transaction has committed
pub type CommitHook = BoxFuture<'static, ()>;

/// Handle to an open store transaction
///
/// Handles are cheap to clone; all clones refer to the same transaction.
/// Either `commit` or `rollback` finishes it, after which store operations
/// through the handle fail.
#[async_trait]
pub trait Transaction: Clone + Send + Sync + 'static {
    async fn commit(&self) -> Result<(), DomainError>;

    async fn rollback(&self) -> Result<(), DomainError>;
}

/// Opens transactions against a store
///
/// `begin` and `commit` report contention as [`DomainError::Conflict`].
#[async_trait]
pub trait TransactionManager: Send + Sync {
    type Tx: Transaction;

    async fn begin(&self) -> Result<Self::Tx, DomainError>;
}

/// A transaction plus the hooks that must only run after it commits
pub struct TransactionScope<Tx> {
    tx: Tx,
    hooks: Arc<Mutex<Vec<CommitHook>>>,
}

impl<Tx: Clone> Clone for TransactionScope<Tx> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            hooks: Arc::clone(&self.hooks),
        }
    }
}

impl<Tx> fmt::Debug for TransactionScope<Tx> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionScope").finish_non_exhaustive()
    }
}

impl<Tx: Transaction> TransactionScope<Tx> {
    pub fn new(tx: Tx) -> Self {
        Self {
            tx,
            hooks: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The transaction store operations should run through
    pub fn tx(&self) -> &Tx {
        &self.tx
    }

    /// Defers work until the transaction commits; dropped on rollback
    pub async fn after_commit(&self, hook: CommitHook) {
        self.hooks.lock().await.push(hook);
    }

    /// Commits the transaction, then runs the deferred hooks in order
    pub async fn commit(self) -> Result<(), DomainError> {
        self.tx.commit().await?;

        let hooks = std::mem::take(&mut *self.hooks.lock().await);

        for hook in hooks {
            hook.await;
        }

        Ok(())
    }

    /// Rolls the transaction back and discards the deferred hooks
    pub async fn rollback(self) -> Result<(), DomainError> {
        self.hooks.lock().await.clear();
        self.tx.rollback().await
    }
}
