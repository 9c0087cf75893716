//! Common types and utilities shared across pktpool.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration (pool size, per-buffer capacity, acquire timeout)
//! - Error types
//! - Identifiers (SlotId)

pub mod config;
pub mod error;
mod slot_id;

pub use config::PoolConfig;
pub use error::{Error, Result};
pub use slot_id::SlotId;
