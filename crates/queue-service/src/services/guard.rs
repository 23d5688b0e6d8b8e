//! Process-wide locks for vote processing and the comparison workflow

use queue_core::DomainError;
use tokio::sync::{Mutex, MutexGuard};

/// The two independent locks shared by every service.
///
/// Vote processing waits its turn on the vote lock. The comparison lock is
/// only ever tried, so a second comparison is turned away instead of queued.
#[derive(Debug, Default)]
pub struct ConcurrencyGuard {
    votes: Mutex<()>,
    comparison: Mutex<()>,
}

impl ConcurrencyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to vote processing
    pub async fn lock_votes(&self) -> MutexGuard<'_, ()> {
        self.votes.lock().await
    }

    /// Take the comparison lock or fail immediately
    pub fn try_lock_comparison(&self) -> Result<MutexGuard<'_, ()>, DomainError> {
        self.comparison
            .try_lock()
            .map_err(|_| DomainError::ComparisonInProgress)
    }
}
