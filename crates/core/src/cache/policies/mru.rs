//! Most Recently Used (MRU) Replacement Policy.
//!
//! This policy evicts the block that was touched most recently, which is
//! usually the block that was just loaded or hit. Bookkeeping is identical to
//! LRU; only the evicted end of the list differs.
//!
//! While counter-intuitive for standard workloads, MRU keeps most of a cyclic
//! working set resident when the loop is larger than the set, where LRU would
//! miss on every access.

use super::{OrderTable, ReplacementPolicy};
use crate::common::{BlockId, SetIndex};
use crate::config::ReplacementPolicy as PolicyType;

/// MRU Policy state.
#[derive(Debug, Clone, Default)]
pub struct MruPolicy {
    /// Recency lists (one per set). Tail is the MRU position (victim).
    order: OrderTable,
}

impl MruPolicy {
    /// Creates a new MRU policy instance.
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

impl ReplacementPolicy for MruPolicy {
    fn kind(&self) -> PolicyType {
        PolicyType::Mru
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

    /// Returns the tail of the recency list (the most recently used block).
    fn choose_victim(&self, set: SetIndex) -> Option<BlockId> {
        self.order.tail(set)
    }
}
