//! Slot - one fixed-capacity buffer position in the pool.
//!
//! A [`Slot`] owns a [`PktBuf`] plus the metadata the pool needs to hand
//! out exclusive ownership and to detect stale handles: an in-use flag and
//! a generation counter, packed into one atomic word so the in-use -> free
//! transition is a single compare-exchange. Two contexts racing to release
//! the same handle therefore resolve to exactly one winner; the loser sees
//! the generation move and fails.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, MutexGuard};

use crate::buf::PktBuf;

/// In-use flag, bit 0 of the packed state word.
const IN_USE: u64 = 1;

/// Pack a generation counter and in-use flag into one state word.
#[inline]
fn pack(generation: u32, in_use: bool) -> u64 {
    (u64::from(generation) << 1) | u64::from(in_use)
}

/// A slot in the buffer pool.
///
/// # Thread Safety
/// All fields use interior mutability for safe concurrent access:
/// - `buf`: `Mutex` - uncontended in practice, since the free queue hands
///   a slot to at most one owner at a time
/// - `state`: `AtomicU64` - generation in the high bits, in-use flag in
///   bit 0, so validation and release act on one consistent word
pub(crate) struct Slot {
    /// The buffer cursor and its backing storage.
    buf: Mutex<PktBuf>,

    /// Packed ownership state. The generation increments on every release,
    /// so tokens from a past ownership episode can be recognized and
    /// rejected.
    state: AtomicU64,
}

impl Slot {
    /// Create a free slot with the given backing capacity.
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buf: Mutex::new(PktBuf::new(capacity)),
            state: AtomicU64::new(pack(0, false)),
        }
    }

    /// Lock the buffer for access.
    #[inline]
    pub(crate) fn lock(&self) -> MutexGuard<'_, PktBuf> {
        self.buf.lock()
    }

    /// Current generation counter.
    #[inline]
    pub(crate) fn generation(&self) -> u32 {
        (self.state.load(Ordering::Acquire) >> 1) as u32
    }

    /// Whether a caller currently holds this slot.
    #[inline]
    pub(crate) fn is_in_use(&self) -> bool {
        self.state.load(Ordering::Acquire) & IN_USE != 0
    }

    /// Whether `generation` names the current ownership episode.
    #[inline]
    pub(crate) fn owned_by(&self, generation: u32) -> bool {
        self.state.load(Ordering::Acquire) == pack(generation, true)
    }

    /// Transition free -> in-use.
    ///
    /// Only called by an acquirer that just popped this slot's index from
    /// the free queue, so there is never a competing writer.
    pub(crate) fn mark_acquired(&self) {
        self.state.fetch_or(IN_USE, Ordering::AcqRel);
    }

    /// Transition in-use -> free, if `generation` still owns the slot.
    ///
    /// Returns `true` for the one caller that performed the transition.
    /// The compare-exchange covers the whole word, so a release racing a
    /// stale token, or two releases racing each other, cannot both win.
    pub(crate) fn try_release(&self, generation: u32) -> bool {
        self.state
            .compare_exchange(
                pack(generation, true),
                pack(generation.wrapping_add(1), false),
                Ordering::AcqRel,
                Ordering::Relaxed,
            )
            .is_ok()
    }
}
