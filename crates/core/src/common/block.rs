//! Block identifier types.
//!
//! A block id names one unit of memory. The cache never looks inside a block;
//! it only tracks which ids are resident in which set.

/// Identifier of a memory block (`0 <= id < memory_blocks`).
pub type BlockId = u64;

/// Index of a cache set (`0 <= set < num_sets`).
pub type SetIndex = usize;

/// Returns true if `id` lies in the addressable range `[0, memory_blocks)`.
#[inline]
pub const fn in_domain(id: BlockId, memory_blocks: u64) -> bool {
    id < memory_blocks
}
