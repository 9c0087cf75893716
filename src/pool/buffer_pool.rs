//! Buffer Pool - the fixed-capacity allocator for protocol buffers.
//!
//! The [`BufferPool`] provides:
//! - Bounded, deterministic allocation: every buffer exists up front
//! - Blocking, non-blocking, and timeout acquire variants
//! - Head-room reservation for headers prepended by lower layers
//! - Generation-checked raw tokens for manual cross-layer handoff

use std::collections::VecDeque;
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};
use tracing::{debug, trace};

use crate::buf::PktBuf;
use crate::common::{Error, PoolConfig, Result, SlotId};
use crate::pool::slot::Slot;
use crate::pool::{BufGuard, BufToken, PoolStats};

/// A fixed pool of protocol data buffers.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────────────┐
/// │                       BufferPool                          │
/// │  ┌──────────────────┐  ┌───────────────────────────────┐  │
/// │  │ free_queue       │  │       slots: Vec<Slot>        │  │
/// │  │ VecDeque<usize>  │─▶│  [Slot0] [Slot1] [Slot2] ...  │  │
/// │  │ (FIFO) + Condvar │  │   each: Mutex<PktBuf> + gen   │  │
/// │  └──────────────────┘  └───────────────────────────────┘  │
/// └───────────────────────────────────────────────────────────┘
/// ```
///
/// # Thread Safety
/// - `free_queue`: `Mutex` + `Condvar` - the single cross-context handoff
///   point; blocked acquires are resumed in FIFO order
/// - `slots`: no outer lock - fixed size, each slot has internal locks
/// - `stats`: no lock - all atomic counters
///
/// Once a context holds a buffer (guard or token), it has exclusive
/// mutation rights over that buffer's cursor until release; no further
/// synchronization is needed for cursor operations.
///
/// # Usage
/// ```
/// use pktpool::{BufferPool, PoolConfig};
///
/// let pool = BufferPool::new(PoolConfig::new(4, 64)).unwrap();
///
/// let mut guard = pool.acquire_with_headroom(4).unwrap();
/// guard.append_slice(b"payload").unwrap();
/// guard.prepend_slice(&[0x02, 0x00, 0x07, 0x00]).unwrap();
/// drop(guard); // slot returns to the free queue
///
/// assert_eq!(pool.free_count(), 4);
/// ```
pub struct BufferPool {
    /// Fixed set of slots allocated at construction. Never grows, so
    /// buffer storage addresses are stable for the pool's lifetime.
    slots: Vec<Slot>,

    /// FIFO of free slot indices.
    free_queue: Mutex<VecDeque<usize>>,

    /// Signaled once per release to wake one blocked acquire.
    available: Condvar,

    /// Performance statistics.
    stats: PoolStats,

    /// Configuration (immutable after construction).
    config: PoolConfig,
}

impl BufferPool {
    /// Create a pool with every slot free.
    ///
    /// # Errors
    /// `Error::InvalidConfig` if `pool_size` or `buf_capacity` is zero.
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;

        let slots: Vec<Slot> = (0..config.pool_size)
            .map(|_| Slot::new(config.buf_capacity))
            .collect();

        let free_queue: VecDeque<usize> = (0..config.pool_size).collect();

        debug!(
            pool_size = config.pool_size,
            buf_capacity = config.buf_capacity,
            "buffer pool initialized"
        );

        Ok(Self {
            slots,
            free_queue: Mutex::new(free_queue),
            available: Condvar::new(),
            stats: PoolStats::new(),
            config,
        })
    }

    // ========================================================================
    // Public API: Acquire (RAII guard path)
    // ========================================================================

    /// Acquire a buffer with no head-room, blocking until one is free.
    ///
    /// Equivalent to [`acquire_with_headroom(0)`](Self::acquire_with_headroom).
    pub fn acquire(&self) -> Result<BufGuard<'_>> {
        self.acquire_with_headroom(0)
    }

    /// Acquire a buffer, blocking until one is free.
    ///
    /// The buffer's window is reset to start at `head_room` with length 0
    /// and its `aux` payload cleared - this is the only place a reused
    /// buffer's window is reset, so no prior owner's logical content is
    /// ever visible to the new owner. Raw storage outside the window is
    /// not zeroed.
    ///
    /// Blocks indefinitely unless the pool was configured with an
    /// acquire timeout (see [`PoolConfig`]). Waiters are resumed in FIFO
    /// order.
    ///
    /// # Errors
    /// - `Error::CapacityExceeded` if `head_room` exceeds the per-buffer
    ///   capacity (checked before taking a slot)
    /// - `Error::Exhausted` if a configured timeout elapses
    pub fn acquire_with_headroom(&self, head_room: usize) -> Result<BufGuard<'_>> {
        self.check_head_room(head_room)?;
        let index = self.pop_free(self.config.acquire_timeout)?;
        Ok(self.guard_for(index, head_room))
    }

    /// Acquire a buffer without blocking.
    ///
    /// # Errors
    /// `Error::Exhausted` immediately if no buffer is free.
    pub fn try_acquire(&self) -> Result<BufGuard<'_>> {
        self.try_acquire_with_headroom(0)
    }

    /// Acquire a buffer with head-room, without blocking.
    ///
    /// # Errors
    /// Same as [`acquire_with_headroom`](Self::acquire_with_headroom), but
    /// `Error::Exhausted` is returned immediately instead of blocking.
    pub fn try_acquire_with_headroom(&self, head_room: usize) -> Result<BufGuard<'_>> {
        self.check_head_room(head_room)?;
        let index = self.pop_free_now()?;
        Ok(self.guard_for(index, head_room))
    }

    /// Acquire a buffer, blocking for at most `timeout`.
    ///
    /// # Errors
    /// `Error::Exhausted` if no buffer became free within `timeout`.
    pub fn acquire_timeout(&self, head_room: usize, timeout: Duration) -> Result<BufGuard<'_>> {
        self.check_head_room(head_room)?;
        let index = self.pop_free(Some(timeout))?;
        Ok(self.guard_for(index, head_room))
    }

    // ========================================================================
    // Public API: Acquire and release (raw token path)
    // ========================================================================

    /// Acquire a buffer as a raw token, blocking until one is free.
    ///
    /// The token path exists for callers that must hand a plain, copyable
    /// handle across layers instead of an RAII guard. Every token use is
    /// generation-checked, so handles from a finished ownership episode
    /// are rejected rather than trusted.
    ///
    /// # Errors
    /// Same as [`acquire_with_headroom`](Self::acquire_with_headroom).
    pub fn acquire_token(&self, head_room: usize) -> Result<BufToken> {
        self.check_head_room(head_room)?;
        let index = self.pop_free(self.config.acquire_timeout)?;
        Ok(self.token_for(index, head_room))
    }

    /// Acquire a buffer as a raw token, without blocking.
    ///
    /// # Errors
    /// `Error::Exhausted` immediately if no buffer is free.
    pub fn try_acquire_token(&self, head_room: usize) -> Result<BufToken> {
        self.check_head_room(head_room)?;
        let index = self.pop_free_now()?;
        Ok(self.token_for(index, head_room))
    }

    /// Lock the buffer an in-use token refers to.
    ///
    /// # Errors
    /// `Error::InvalidHandle` if the token's slot was released (and
    /// possibly re-acquired by another owner) since the token was issued.
    pub fn buf(&self, token: &BufToken) -> Result<MutexGuard<'_, PktBuf>> {
        let slot = self.checked_slot(token).ok_or_else(|| {
            debug!(slot_id = %token.slot_id, "stale or foreign token");
            Error::InvalidHandle(token.slot_id)
        })?;
        Ok(slot.lock())
    }

    /// Release a token's buffer back to the free queue.
    ///
    /// Safe to call from a different thread than the one that acquired the
    /// token; the free queue is the synchronization point. Wakes exactly
    /// one blocked acquire, if any.
    ///
    /// # Errors
    /// - `Error::InvalidHandle` if the token's slot index is foreign to
    ///   this pool
    /// - `Error::DoubleRelease` if the token's slot is not currently
    ///   in-use under this token's generation. When two contexts race to
    ///   release copies of the same token, exactly one succeeds; the other
    ///   gets this error.
    pub fn release(&self, token: BufToken) -> Result<()> {
        let slot = self.slots.get(token.slot_id.0).ok_or_else(|| {
            debug!(slot_id = %token.slot_id, "release of a foreign token");
            Error::InvalidHandle(token.slot_id)
        })?;

        // The compare-exchange is the only gate: whoever moves the state
        // word owns the enqueue, so the index can never enter the free
        // queue twice.
        if !slot.try_release(token.generation) {
            debug!(slot_id = %token.slot_id, "release of a token that owns nothing");
            return Err(Error::DoubleRelease(token.slot_id));
        }

        self.enqueue_free(token.slot_id);
        Ok(())
    }

    // ========================================================================
    // Public API: Pool info
    // ========================================================================

    /// Number of slots in the pool.
    pub fn pool_size(&self) -> usize {
        self.config.pool_size
    }

    /// Per-buffer backing capacity in bytes.
    pub fn buf_capacity(&self) -> usize {
        self.config.buf_capacity
    }

    /// Number of buffers currently in the free queue.
    pub fn free_count(&self) -> usize {
        self.free_queue.lock().len()
    }

    /// Number of buffers currently held by callers.
    pub fn in_use_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_in_use()).count()
    }

    /// Get pool statistics.
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }

    // ========================================================================
    // Internal: Free queue
    // ========================================================================

    /// Pop a free slot index, blocking (optionally up to `timeout`).
    fn pop_free(&self, timeout: Option<Duration>) -> Result<usize> {
        let deadline = timeout.map(|t| Instant::now() + t);
        let mut free = self.free_queue.lock();

        loop {
            if let Some(index) = free.pop_front() {
                return Ok(index);
            }

            self.stats.waits.fetch_add(1, Ordering::Relaxed);
            trace!("no free buffer, waiting");

            match deadline {
                None => self.available.wait(&mut free),
                Some(deadline) => {
                    if self.available.wait_until(&mut free, deadline).timed_out() {
                        self.stats.exhausted.fetch_add(1, Ordering::Relaxed);
                        debug!("acquire timed out waiting for a free buffer");
                        return Err(Error::Exhausted);
                    }
                }
            }
        }
    }

    /// Pop a free slot index without blocking.
    fn pop_free_now(&self) -> Result<usize> {
        match self.free_queue.lock().pop_front() {
            Some(index) => Ok(index),
            None => {
                self.stats.exhausted.fetch_add(1, Ordering::Relaxed);
                debug!("failed to get free buffer");
                Err(Error::Exhausted)
            }
        }
    }

    /// Release a guard's slot back to the pool.
    ///
    /// Called by `BufGuard::drop`. Never blocks. Goes through the same
    /// compare-exchange as token release; the guard owns its episode
    /// exclusively, so losing it means the pool state was corrupted.
    pub(crate) fn reclaim(&self, slot_id: SlotId, generation: u32) {
        let released = self.slots[slot_id.0].try_release(generation);
        debug_assert!(released, "guard released a slot it did not own");
        if released {
            self.enqueue_free(slot_id);
        }
    }

    /// Put a just-freed slot index at the back of the free queue and wake
    /// one waiter. The caller must have won the in-use -> free transition.
    fn enqueue_free(&self, slot_id: SlotId) {
        {
            let mut free = self.free_queue.lock();
            free.push_back(slot_id.0);
        }
        self.available.notify_one();

        self.stats.releases.fetch_add(1, Ordering::Relaxed);
        trace!(slot = slot_id.0, "buffer released");
    }

    // ========================================================================
    // Internal: Slot setup and validation
    // ========================================================================

    /// Validate a head-room request against the per-buffer capacity.
    fn check_head_room(&self, head_room: usize) -> Result<()> {
        if head_room > self.config.buf_capacity {
            return Err(Error::CapacityExceeded {
                requested: head_room,
                available: self.config.buf_capacity,
            });
        }
        Ok(())
    }

    /// Mark a freshly popped slot in-use and reset its cursor.
    fn setup_slot(&self, index: usize, head_room: usize) -> MutexGuard<'_, PktBuf> {
        let slot = &self.slots[index];
        let mut buf = slot.lock();
        buf.reset(head_room);
        slot.mark_acquired();

        self.stats.acquires.fetch_add(1, Ordering::Relaxed);
        trace!(slot = index, head_room, "buffer acquired");

        buf
    }

    fn guard_for(&self, index: usize, head_room: usize) -> BufGuard<'_> {
        let lock = self.setup_slot(index, head_room);
        let generation = self.slots[index].generation();
        BufGuard::new(self, SlotId::new(index), generation, lock)
    }

    fn token_for(&self, index: usize, head_room: usize) -> BufToken {
        drop(self.setup_slot(index, head_room));
        BufToken {
            slot_id: SlotId::new(index),
            generation: self.slots[index].generation(),
        }
    }

    /// Look up a token's slot if the token still names a live episode.
    fn checked_slot(&self, token: &BufToken) -> Option<&Slot> {
        self.slots
            .get(token.slot_id.0)
            .filter(|slot| slot.owned_by(token.generation))
    }
}
