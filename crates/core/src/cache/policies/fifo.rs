//! First-In, First-Out (FIFO) Replacement Policy.
//!
//! This policy evicts the block that entered the set first, regardless of how
//! recently it was accessed. Blocks join the tail of the arrival list when they
//! are loaded and never move on a hit.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `record_access()`: O(W) membership check
//!   - `choose_victim()`: O(1)
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Best Case:** Streaming accesses where all blocks have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict hot blocks)

use super::{OrderTable, ReplacementPolicy};
use crate::common::{BlockId, SetIndex};
use crate::config::ReplacementPolicy as PolicyType;

/// FIFO Policy state.
#[derive(Debug, Clone, Default)]
pub struct FifoPolicy {
    /// Arrival lists (one per set). Head is the oldest block.
    order: OrderTable,
}

impl FifoPolicy {
    /// Creates a new FIFO policy instance.
    ///
    /// # Arguments
    ///
    /// * `sets` - The number of sets in the cache.
    pub fn new(sets: usize) -> Self {
        Self {
            order: OrderTable::new(sets),
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    fn kind(&self) -> PolicyType {
        PolicyType::Fifo
    }

    fn order(&self) -> &OrderTable {
        &self.order
    }

    fn order_mut(&mut self) -> &mut OrderTable {
        &mut self.order
    }

    fn hit_note(&self) -> String {
        "FIFO order unchanged.".to_string()
    }

    fn victim_label(&self) -> String {
        "oldest".to_string()
    }

    /// Appends `block` on arrival; a hit leaves the order as it was.
    fn record_access(&mut self, block: BlockId, set: SetIndex) {
        self.order.push_if_absent(set, block);
    }

    /// Returns the head of the arrival list (first in).
    fn choose_victim(&self, set: SetIndex) -> Option<BlockId> {
        self.order.head(set)
    }
}
