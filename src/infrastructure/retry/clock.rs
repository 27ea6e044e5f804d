//! Time source for retry delays

use std::fmt::Debug;
use std::time::{Duration, Instant};

use async_trait::async_trait;

/// Monotonic clock the retry executor reads and sleeps on
#[async_trait]
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Instant;

    async fn sleep(&self, duration: Duration);
}

/// Real time via the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
