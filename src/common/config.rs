//! Configuration for the buffer pool.

use std::time::Duration;

use crate::common::{Error, Result};

/// Default number of buffers in a pool.
///
/// Five outstanding buffers covers a typical HCI-style link layer: one
/// command in flight, one event being processed, and a few ACL frames
/// queued between the driver and the host stack.
pub const DEFAULT_POOL_SIZE: usize = 5;

/// Default per-buffer capacity in bytes.
///
/// Sized for the largest single HCI frame including every header a layer
/// may prepend (ACL header + L2CAP header + payload).
pub const DEFAULT_BUF_CAPACITY: usize = 74;

/// Buffer pool configuration.
///
/// Both sizing knobs are fixed once the pool is constructed:
/// - `pool_size` - how many buffers may be outstanding at once
/// - `buf_capacity` - the largest frame a single buffer can hold,
///   including all headers
///
/// # Example
/// ```
/// use std::time::Duration;
/// use pktpool::PoolConfig;
///
/// let config = PoolConfig::new(8, 256).acquire_timeout(Duration::from_millis(50));
/// assert_eq!(config.pool_size, 8);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of buffers in the pool.
    pub pool_size: usize,

    /// Capacity of each buffer's backing storage in bytes.
    pub buf_capacity: usize,

    /// Upper bound on how long a blocking acquire may wait.
    ///
    /// `None` means wait indefinitely. Indefinite blocking is a common
    /// embedded-systems hazard, so callers that cannot tolerate it should
    /// set a bound here or use the `try_`/`_timeout` acquire variants.
    pub acquire_timeout: Option<Duration>,
}

impl PoolConfig {
    /// Create a configuration with the given sizing and no acquire timeout.
    pub fn new(pool_size: usize, buf_capacity: usize) -> Self {
        Self {
            pool_size,
            buf_capacity,
            acquire_timeout: None,
        }
    }

    /// Set a default timeout for blocking acquires.
    #[must_use]
    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = Some(timeout);
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// `Error::InvalidConfig` if either sizing knob is zero.
    pub fn validate(&self) -> Result<()> {
        if self.pool_size == 0 {
            return Err(Error::InvalidConfig("pool_size must be > 0"));
        }
        if self.buf_capacity == 0 {
            return Err(Error::InvalidConfig("buf_capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE, DEFAULT_BUF_CAPACITY)
    }
}
