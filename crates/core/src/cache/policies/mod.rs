//! Cache Replacement Policies.
//!
//! Implements the algorithms that order the blocks of a set and pick the one
//! to evict when the set is full.
//!
//! # Policies
//!
//! - `Lru`: Least Recently Used (evict the head of a recency list).
//! - `Mru`: Most Recently Used (evict the tail of the same recency list).
//! - `Fifo`: First-In, First-Out (evict the head of an arrival list).
//!
//! All three keep one [`OrderTable`]; the trait's provided methods cover
//! forgetting, snapshots, and explanations so each policy only states how it
//! records an access and which end it evicts from.

/// First-In, First-Out replacement policy.
pub mod fifo;

/// Least Recently Used replacement policy.
pub mod lru;

/// Most Recently Used replacement policy.
pub mod mru;

/// Per-set order lists.
pub mod order;

use std::fmt;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;
pub use mru::MruPolicy;
pub use order::{OrderSnapshot, OrderTable};

use crate::common::{BlockId, SetIndex};
use crate::config::ReplacementPolicy as PolicyType;

/// Trait for cache replacement policies.
///
/// The order list of every set must always hold exactly the blocks resident
/// in that set; [`crate::cache::CacheEngine`] maintains this by calling
/// [`ReplacementPolicy::forget`] once per eviction and
/// [`ReplacementPolicy::record_access`] after every hit and every fill.
pub trait ReplacementPolicy: fmt::Debug + Send + Sync {
    /// Which algorithm this is.
    fn kind(&self) -> PolicyType;

    /// The order lists.
    fn order(&self) -> &OrderTable;

    /// The order lists, mutably.
    fn order_mut(&mut self) -> &mut OrderTable;

    /// Updates the order of `set` after `block` was hit or filled.
    ///
    /// # Arguments
    ///
    /// * `block` - The block that was accessed.
    /// * `set` - The set it lives in.
    fn record_access(&mut self, block: BlockId, set: SetIndex);

    /// Selects the block to evict from a full set.
    ///
    /// # Returns
    ///
    /// The victim, or `None` if the set has no tracked blocks.
    fn choose_victim(&self, set: SetIndex) -> Option<BlockId>;

    /// Sentence appended to the explanation of a hit.
    fn hit_note(&self) -> String {
        format!("Updated {} order.", self.kind())
    }

    /// Adjective naming the victim in the explanation of an eviction.
    fn victim_label(&self) -> String {
        self.kind().to_string()
    }

    /// Drops `block` from the order of `set`. No-op if absent.
    fn forget(&mut self, block: BlockId, set: SetIndex) {
        let _ = self.order_mut().remove(set, block);
    }

    /// Describes what happened on an access, for the transcript.
    ///
    /// Call after the access has been applied so the printed order is current.
    fn explain(
        &self,
        block: BlockId,
        set: SetIndex,
        was_hit: bool,
        evicted: Option<BlockId>,
    ) -> String {
        let mut text = format!("Access block {block} → Set {set}. ");
        match (was_hit, evicted) {
            (true, _) => {
                text.push_str(&format!("HIT! Block {block} found in cache. {}", self.hit_note()));
            }
            (false, Some(victim)) => text.push_str(&format!(
                "MISS! Cache full. Removed {} block {victim}, loaded block {block}.",
                self.victim_label()
            )),
            (false, None) => text.push_str(&format!(
                "MISS! Loaded block {block} into available cache slot."
            )),
        }
        let order = self
            .order()
            .get(set)
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!(" Current {} order: [{order}]", self.kind()));
        text
    }

    /// Returns a deep copy of the order lists.
    fn snapshot(&self) -> OrderSnapshot {
        self.order().snapshot()
    }

    /// Replaces the order lists. Returns `false` on a set-count mismatch.
    fn restore(&mut self, state: &OrderSnapshot) -> bool {
        self.order_mut().restore(state)
    }

    /// Empties the order lists.
    fn reset(&mut self) {
        self.order_mut().reset();
    }
}

/// Builds the policy selected by `policy` for a cache of `sets` sets.
pub fn build(policy: PolicyType, sets: usize) -> Box<dyn ReplacementPolicy> {
    match policy {
        PolicyType::Lru => Box::new(LruPolicy::new(sets)),
        PolicyType::Mru => Box::new(MruPolicy::new(sets)),
        PolicyType::Fifo => Box::new(FifoPolicy::new(sets)),
    }
}
