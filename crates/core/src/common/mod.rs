//! Common types used throughout the cache simulator.
//!
//! This module provides the shared building blocks of the crate:
//! 1. **Block Ids:** The identifier naming a unit of memory tracked by the cache.
//! 2. **Error Handling:** Configuration and session error types.

/// Block identifier definitions.
pub mod block;

/// Error types.
pub mod error;

pub use block::{BlockId, SetIndex};
pub use error::{ConfigError, SessionError};
