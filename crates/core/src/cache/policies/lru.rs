//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the block of a set that has gone untouched the longest.
//! Every hit or fill moves the block to the tail of the set's recency list, so
//! the head is always the least recently used block.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `record_access()`: O(W) where W is the number of ways (associativity)
//!   - `choose_victim()`: O(1)
//! - **Space Complexity:** O(S × W) where S is the number of sets
//! - **Best Case:** Working sets that fit in a set with good temporal locality
//! - **Worst Case:** Cyclic scans one block larger than the set (every access misses)

use super::{OrderTable, ReplacementPolicy};
use crate::common::{BlockId, SetIndex};
use crate::config::ReplacementPolicy as PolicyType;

/// LRU Policy state.
#[derive(Debug, Clone, Default)]
pub struct LruPolicy {
    /// Recency lists (one per set). Head is LRU, tail is MRU.
    order: OrderTable,
}

impl LruPolicy {
    /// Creates a new LRU policy instance.
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

impl ReplacementPolicy for LruPolicy {
    fn kind(&self) -> PolicyType {
        PolicyType::Lru
    }

    fn order(&self) -> &OrderTable {
        &self.order
    }

    fn order_mut(&mut self) -> &mut OrderTable {
        &mut self.order
    }

    /// Moves `block` to the tail (MRU position).
    fn record_access(&mut self, block: BlockId, set: SetIndex) {
        self.order.move_to_tail(set, block);
    }

    /// Returns the head of the recency list (LRU position).
    fn choose_victim(&self, set: SetIndex) -> Option<BlockId> {
        self.order.head(set)
    }
}
