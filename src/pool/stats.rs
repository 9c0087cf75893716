//! Buffer pool statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics tracked by the buffer pool.
///
/// Plain atomic counters, bumped on the pool's hot paths without taking a
/// lock. Everything uses `Ordering::Relaxed`: the counters carry no
/// ownership information, so atomicity per counter is all that is needed,
/// and a snapshot may trail traffic still in flight.
#[derive(Debug)]
pub struct PoolStats {
    /// Number of successful acquires.
    pub acquires: AtomicU64,

    /// Number of releases back into the free queue.
    pub releases: AtomicU64,

    /// Number of acquires that failed with `Exhausted`
    /// (non-blocking misses and timeouts).
    pub exhausted: AtomicU64,

    /// Number of times an acquire had to block for a free buffer.
    pub waits: AtomicU64,
}

impl PoolStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            acquires: AtomicU64::new(0),
            releases: AtomicU64::new(0),
            exhausted: AtomicU64::new(0),
            waits: AtomicU64::new(0),
        }
    }

    /// Get a snapshot of current statistics.
    ///
    /// This returns a non-atomic copy for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            acquires: self.acquires.load(Ordering::Relaxed),
            releases: self.releases.load(Ordering::Relaxed),
            exhausted: self.exhausted.load(Ordering::Relaxed),
            waits: self.waits.load(Ordering::Relaxed),
        }
    }
}

impl Default for PoolStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`PoolStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Number of successful acquires.
    pub acquires: u64,
    /// Number of releases.
    pub releases: u64,
    /// Number of `Exhausted` failures.
    pub exhausted: u64,
    /// Number of blocking waits.
    pub waits: u64,
}

impl StatsSnapshot {
    /// Buffers handed out and not yet returned at snapshot time.
    pub fn outstanding(&self) -> u64 {
        self.acquires.saturating_sub(self.releases)
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "acquires: {}, releases: {}, exhausted: {}, waits: {}",
            self.acquires, self.releases, self.exhausted, self.waits
        )
    }
}
