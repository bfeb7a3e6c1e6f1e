//! Time source for settling waits
//!
//! The scheduler never sleeps directly; it asks a [`Clock`], so tests can
//! substitute a clock that records requested delays instead of waiting.

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;

/// Suspends the current task
#[async_trait]
pub trait Clock: Send + Sync + Debug {
    /// Wait for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation backed by the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
