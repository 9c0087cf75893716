//! Buffer pool management.
//!
//! The pool hands out exclusive ownership of fixed-capacity buffers from a
//! set allocated once at construction. Exhaustion never allocates: a
//! blocking acquire waits for a release, a non-blocking one fails fast.
//!
//! # Components
//! - [`BufferPool`] - the allocator: free queue, acquire/release
//! - [`BufGuard`] - RAII ownership of one buffer, releases on drop
//! - [`BufToken`] - copyable raw handle, generation-checked by the pool
//! - [`PoolStats`] - performance statistics

mod buffer_pool;
mod guard;
mod slot;
mod stats;

pub use buffer_pool::BufferPool;
pub use guard::{BufGuard, BufToken};
pub use stats::{PoolStats, StatsSnapshot};
