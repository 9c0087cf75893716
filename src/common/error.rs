//! Error types for pktpool.

use thiserror::Error;

use crate::common::SlotId;

/// Crate-wide result alias.
///
/// Every fallible pool and cursor operation returns this, so signatures
/// stay short and the error type stays in one place.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors in pktpool.
///
/// The taxonomy splits into recoverable conditions (`Exhausted`) and
/// logic errors that indicate a protocol-layer bug (`CapacityExceeded`,
/// `InvalidHandle`, `DoubleRelease`). Logic errors never mutate state:
/// a failed append/prepend/consume leaves the buffer window untouched.
#[derive(Debug, Error)]
pub enum Error {
    /// No free buffer was available at acquire time.
    ///
    /// Returned by the non-blocking and timeout acquire variants. The
    /// caller should retry, back off, or drop the pending operation.
    #[error("no free buffer available in pool")]
    Exhausted,

    /// A cursor operation would overflow or underflow the buffer window.
    ///
    /// Surfaced fail-fast rather than truncating, since silent truncation
    /// corrupts protocol framing.
    #[error("capacity exceeded: requested {requested} bytes, {available} available")]
    CapacityExceeded {
        /// Bytes the operation asked for.
        requested: usize,
        /// Bytes the window had room for.
        available: usize,
    },

    /// A token referred to a slot it no longer owns (or never owned).
    ///
    /// Happens when a token outlives its ownership episode: the slot was
    /// released and possibly re-acquired by someone else.
    #[error("{0} is not held by this token")]
    InvalidHandle(SlotId),

    /// Release was called on a token whose slot is not in use.
    ///
    /// This indicates a bug - every acquire must be matched by exactly
    /// one release.
    #[error("{0} released twice")]
    DoubleRelease(SlotId),

    /// The pool configuration is unusable.
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Exhausted;
        assert_eq!(format!("{}", err), "no free buffer available in pool");

        let err = Error::CapacityExceeded {
            requested: 10,
            available: 4,
        };
        assert_eq!(
            format!("{}", err),
            "capacity exceeded: requested 10 bytes, 4 available"
        );

        let err = Error::DoubleRelease(SlotId::new(3));
        assert_eq!(format!("{}", err), "Slot(3) released twice");
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
