//! PktBuf - the buffer cursor over a fixed-capacity byte region.
//!
//! A [`PktBuf`] maintains a data *window* inside its backing storage,
//! defined by a start offset and a length. Protocol layers grow the window
//! at the tail ([`append`](PktBuf::append)), grow it at the head
//! ([`prepend`](PktBuf::prepend)) to build nested headers from the inside
//! out, and shrink it from the head ([`consume`](PktBuf::consume)) when
//! stripping headers on receive. All window operations are O(1) offset
//! arithmetic; no data is ever moved or copied.

use std::any::Any;
use std::fmt;

use crate::common::{Error, Result};

/// A protocol data buffer with head-room and tail-room accounting.
///
/// # Layout
/// ```text
/// storage: [ head-room | window (start..start+len) | tail-room ]
///            ^prepend grows left   ^append grows right
/// ```
///
/// Invariants (checked on every mutation):
/// - `start <= capacity`
/// - `start + len <= capacity`
///
/// A `PktBuf` is normally owned by a pool slot and reached through a
/// [`BufGuard`](crate::pool::BufGuard) or a token, which is what makes the
/// single-owner-at-a-time discipline hold; the cursor itself does no
/// internal locking.
///
/// Bytes outside the window are never read by this type and are *not*
/// zeroed between ownership episodes.
pub struct PktBuf {
    /// Backing storage, allocated once and never resized.
    data: Box<[u8]>,

    /// Offset where the active data window begins.
    start: usize,

    /// Length of the active data window.
    len: usize,

    /// Opaque caller-owned payload, cleared on each acquire.
    aux: Option<Box<dyn Any + Send>>,
}

impl PktBuf {
    /// Create a buffer with the given backing capacity and an empty window.
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity].into_boxed_slice(),
            start: 0,
            len: 0,
            aux: None,
        }
    }

    /// Reset the cursor for a new ownership episode.
    ///
    /// Leaves storage bytes untouched; only the window and `aux` reset.
    /// The caller must have checked `head_room <= capacity`.
    pub(crate) fn reset(&mut self, head_room: usize) {
        debug_assert!(head_room <= self.capacity());
        self.start = head_room;
        self.len = 0;
        self.aux = None;
    }

    // ========================================================================
    // Window mutation
    // ========================================================================

    /// Grow the window at the tail by `len` bytes.
    ///
    /// Returns the newly added tail region for the caller to fill.
    ///
    /// # Errors
    /// `Error::CapacityExceeded` if `len` exceeds the remaining tail room.
    /// The window is unchanged on failure.
    pub fn append(&mut self, len: usize) -> Result<&mut [u8]> {
        let room = self.tail_room();
        if len > room {
            return Err(Error::CapacityExceeded {
                requested: len,
                available: room,
            });
        }

        let at = self.start + self.len;
        self.len += len;
        Ok(&mut self.data[at..at + len])
    }

    /// Grow the window at the head by `len` bytes.
    ///
    /// Returns the newly added head region for the caller to write a header
    /// into. Used to build nested protocol headers from the inside out:
    /// the innermost layer appends its payload first, then each outer layer
    /// prepends its header.
    ///
    /// # Errors
    /// `Error::CapacityExceeded` if `len` exceeds the head room reserved at
    /// acquire time (or freed by prior consumption). The window is
    /// unchanged on failure.
    pub fn prepend(&mut self, len: usize) -> Result<&mut [u8]> {
        let room = self.head_room();
        if len > room {
            return Err(Error::CapacityExceeded {
                requested: len,
                available: room,
            });
        }

        self.start -= len;
        self.len += len;
        Ok(&mut self.data[self.start..self.start + len])
    }

    /// Shrink the window by `len` bytes from the head.
    ///
    /// Returns the consumed bytes. Used when stripping a header already
    /// processed by a lower layer, advancing the window without copying.
    ///
    /// # Errors
    /// `Error::CapacityExceeded` if `len` exceeds the window length.
    /// The window is unchanged on failure.
    pub fn consume(&mut self, len: usize) -> Result<&[u8]> {
        if len > self.len {
            return Err(Error::CapacityExceeded {
                requested: len,
                available: self.len,
            });
        }

        let at = self.start;
        self.start += len;
        self.len -= len;
        Ok(&self.data[at..at + len])
    }

    /// Append `src` to the tail of the window, copying it in.
    ///
    /// # Errors
    /// `Error::CapacityExceeded` if `src` exceeds the remaining tail room.
    pub fn append_slice(&mut self, src: &[u8]) -> Result<()> {
        self.append(src.len())?.copy_from_slice(src);
        Ok(())
    }

    /// Prepend `src` before the head of the window, copying it in.
    ///
    /// # Errors
    /// `Error::CapacityExceeded` if `src` exceeds the remaining head room.
    pub fn prepend_slice(&mut self, src: &[u8]) -> Result<()> {
        self.prepend(src.len())?.copy_from_slice(src);
        Ok(())
    }

    // ========================================================================
    // Room and window queries
    // ========================================================================

    /// Bytes available before the window for future `prepend`.
    #[inline]
    pub fn head_room(&self) -> usize {
        self.start
    }

    /// Bytes available after the window for future `append`.
    #[inline]
    pub fn tail_room(&self) -> usize {
        self.capacity() - self.start - self.len
    }

    /// Total backing storage capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Length of the active data window.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the window is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The active data window.
    #[inline]
    pub fn window(&self) -> &[u8] {
        &self.data[self.start..self.start + self.len]
    }

    /// The active data window, mutably.
    #[inline]
    pub fn window_mut(&mut self) -> &mut [u8] {
        &mut self.data[self.start..self.start + self.len]
    }

    // ========================================================================
    // Opaque caller payload
    // ========================================================================

    /// Attach a caller-owned value to this buffer.
    ///
    /// The pool never interprets it; it is dropped when the slot's next
    /// acquire resets the cursor.
    pub fn set_aux<T: Any + Send>(&mut self, value: T) {
        self.aux = Some(Box::new(value));
    }

    /// Borrow the attached value, if any, downcast to `T`.
    pub fn aux<T: Any + Send>(&self) -> Option<&T> {
        self.aux.as_deref().and_then(|a| a.downcast_ref())
    }

    /// Detach and return the attached value, if any.
    pub fn take_aux(&mut self) -> Option<Box<dyn Any + Send>> {
        self.aux.take()
    }
}

impl fmt::Debug for PktBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PktBuf")
            .field("capacity", &self.capacity())
            .field("start", &self.start)
            .field("len", &self.len)
            .field("has_aux", &self.aux.is_some())
            .finish()
    }
}
