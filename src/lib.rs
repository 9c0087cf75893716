//! pktpool - a fixed-capacity buffer pool for network protocol stacks.
//!
//! Designed for link-layer stacks (e.g. a Bluetooth HCI layer) on
//! memory-constrained targets: every buffer is allocated up front, so the
//! hot path never touches the heap and allocation is bounded and
//! deterministic. Each buffer carries a cursor with head-room and
//! tail-room accounting, letting layers prepend headers and append
//! payload into pre-reserved space without copying.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                       BufferPool                        │
//! │   free queue (blocking FIFO of slot indices)            │
//! │        │ acquire                     ▲ release          │
//! │        ▼                             │                  │
//! │   [Slot] [Slot] [Slot] ...    BufGuard / BufToken       │
//! │      each slot owns a PktBuf:                           │
//! │      [ head-room │ data window │ tail-room ]            │
//! │        ◀ prepend               append ▶                 │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (SlotId, Error, config)
//! - [`buf`] - The buffer cursor (append/prepend/consume)
//! - [`pool`] - The pool allocator, guards, tokens, statistics
//!
//! # Quick Start
//! ```
//! use pktpool::{BufferPool, PoolConfig};
//!
//! let pool = BufferPool::new(PoolConfig::new(5, 64))?;
//!
//! // Reserve 4 bytes of head-room for the link-layer header.
//! let mut buf = pool.acquire_with_headroom(4)?;
//! buf.append_slice(b"payload")?;          // inner layer writes first
//! buf.prepend_slice(&[0x02, 0, 7, 0])?;   // outer layer adds its header
//! assert_eq!(buf.len(), 11);
//! // buf drops here; the slot goes back to the free queue
//! # Ok::<(), pktpool::Error>(())
//! ```

pub mod buf;
pub mod common;
pub mod pool;

// Re-export commonly used items at crate root for convenience
pub use buf::PktBuf;
pub use common::config::{DEFAULT_BUF_CAPACITY, DEFAULT_POOL_SIZE};
pub use common::{Error, PoolConfig, Result, SlotId};
pub use pool::{BufGuard, BufToken, BufferPool, PoolStats, StatsSnapshot};
