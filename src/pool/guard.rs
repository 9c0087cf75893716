//! RAII guard and raw token for buffer ownership.
//!
//! [`BufGuard`] is the primary way to hold a buffer: it derefs to
//! [`PktBuf`] and returns the slot to the pool's free queue when dropped.
//! A guard may be sent to another thread and dropped there, which is how a
//! producer hands a filled buffer to a consumer.
//!
//! [`BufToken`] is the escape hatch for callers that must pass a bare,
//! copyable handle across layers. Token access and release are
//! generation-checked by the pool, so stale tokens fail with an error
//! instead of touching a slot they no longer own.

use std::ops::{Deref, DerefMut};

use parking_lot::MutexGuard;

use crate::buf::PktBuf;
use crate::common::SlotId;

use super::buffer_pool::BufferPool;

/// Exclusive ownership of one pool buffer for the guard's lifetime.
///
/// The slot is released back to the pool when the guard drops, waking one
/// blocked acquire if any. Double release is unrepresentable on this path:
/// there is nothing to call twice.
///
/// # Example
/// ```ignore
/// let mut guard = pool.acquire_with_headroom(4)?;
/// guard.append_slice(payload)?;   // DerefMut to PktBuf
/// guard.prepend_slice(&header)?;
/// // guard drops here, slot returns to the free queue
/// ```
pub struct BufGuard<'a> {
    /// Reference back to the pool for release on drop.
    pool: &'a BufferPool,
    /// Which slot this guard owns.
    slot_id: SlotId,
    /// The ownership episode this guard belongs to.
    generation: u32,
    /// Lock guard providing access to the buffer cursor.
    lock: MutexGuard<'a, PktBuf>,
}

impl<'a> BufGuard<'a> {
    /// Create a new guard.
    ///
    /// Called by the pool's acquire methods.
    pub(crate) fn new(
        pool: &'a BufferPool,
        slot_id: SlotId,
        generation: u32,
        lock: MutexGuard<'a, PktBuf>,
    ) -> Self {
        Self {
            pool,
            slot_id,
            generation,
            lock,
        }
    }

    /// Get the slot ID.
    #[inline]
    pub fn slot_id(&self) -> SlotId {
        self.slot_id
    }
}

impl Deref for BufGuard<'_> {
    type Target = PktBuf;

    #[inline]
    fn deref(&self) -> &PktBuf {
        &self.lock
    }
}

impl DerefMut for BufGuard<'_> {
    #[inline]
    fn deref_mut(&mut self) -> &mut PktBuf {
        &mut self.lock
    }
}

impl Drop for BufGuard<'_> {
    fn drop(&mut self) {
        // The slot re-enters the free queue here; the buffer lock itself
        // is still held until the `lock` field drops, so a racing acquire
        // of the same slot waits those few instructions.
        self.pool.reclaim(self.slot_id, self.generation);
    }
}

/// A raw, copyable handle to an acquired buffer.
///
/// Pairs a slot ID with the generation of the ownership episode that
/// produced it. The pool validates both on every use, so a token held past
/// its release yields [`Error::InvalidHandle`](crate::Error::InvalidHandle)
/// or [`Error::DoubleRelease`](crate::Error::DoubleRelease) rather than
/// reaching another owner's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufToken {
    pub(crate) slot_id: SlotId,
    pub(crate) generation: u32,
}

impl BufToken {
    /// Get the slot ID.
    #[inline]
    pub fn slot_id(&self) -> SlotId {
        self.slot_id
    }
}
