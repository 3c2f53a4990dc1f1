//! Error definitions.
//!
//! The engine itself never fails: impossible lookups and out-of-range steps
//! are reported as `None`/`false`. Errors exist only at the edges:
//! 1. **Configuration:** Rejected before a cache engine is built.
//! 2. **Session:** Commands issued out of order (stepping before a test case is loaded).

use thiserror::Error;

/// Invalid cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Total block count is not a power of two or is below the minimum.
    #[error("cache blocks must be a power of 2 and at least {min} (got {got})")]
    TotalBlocks {
        /// Value supplied.
        got: usize,
        /// Smallest accepted value.
        min: usize,
    },

    /// Line size is not a power of two or is below the minimum.
    #[error("line size must be a power of 2 and at least {min} (got {got})")]
    LineSize {
        /// Value supplied.
        got: usize,
        /// Smallest accepted value.
        min: usize,
    },

    /// Associativity is neither 1 nor a power of two dividing the block count.
    #[error("blocks per set must be 1 or a power of 2 dividing {total_blocks} (got {ways})")]
    Ways {
        /// Ways supplied.
        ways: usize,
        /// Total block count the ways must divide.
        total_blocks: usize,
    },

    /// Addressable memory is smaller than the cache itself.
    #[error("memory must hold at least {total_blocks} blocks (got {memory_blocks})")]
    MemoryBlocks {
        /// Memory size supplied, in blocks.
        memory_blocks: u64,
        /// Cache size in blocks.
        total_blocks: usize,
    },
}

/// Command issued in a state that cannot honor it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No cache has been initialized yet.
    #[error("cache is not initialized; send `init` first")]
    NotInitialized,

    /// A cache exists but no access sequence has been loaded.
    #[error("no test case loaded; send `load` first")]
    NoSequence,

    /// The requested configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
