//! Per-set order lists shared by every replacement policy.
//!
//! Each set keeps its resident blocks in a list with the head at index 0 and
//! the tail at the end. Policies differ only in how they append to the list
//! and which end they evict from; the bookkeeping lives here.

use crate::common::{BlockId, SetIndex};

/// Deep copy of every set's order list.
pub type OrderSnapshot = Vec<Vec<BlockId>>;

/// Order lists for all sets. A block appears at most once per list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderTable {
    sets: OrderSnapshot,
}

impl OrderTable {
    /// Creates `sets` empty order lists.
    pub fn new(sets: usize) -> Self {
        Self {
            sets: vec![Vec::new(); sets],
        }
    }

    /// Number of sets tracked.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Order list of `set`, head first (empty for an out-of-range set).
    pub fn get(&self, set: SetIndex) -> &[BlockId] {
        self.sets.get(set).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns true if `block` is in the list of `set`.
    pub fn contains(&self, set: SetIndex, block: BlockId) -> bool {
        self.get(set).contains(&block)
    }

    /// Moves `block` to the tail of `set`, inserting it if absent.
    pub fn move_to_tail(&mut self, set: SetIndex, block: BlockId) {
        if let Some(list) = self.sets.get_mut(set) {
            list.retain(|&b| b != block);
            list.push(block);
        }
    }

    /// Appends `block` to the tail of `set` unless it is already listed.
    pub fn push_if_absent(&mut self, set: SetIndex, block: BlockId) {
        if let Some(list) = self.sets.get_mut(set) {
            if !list.contains(&block) {
                list.push(block);
            }
        }
    }

    /// Removes `block` from `set`. Returns `false` if it was not listed.
    pub fn remove(&mut self, set: SetIndex, block: BlockId) -> bool {
        let Some(list) = self.sets.get_mut(set) else {
            return false;
        };
        let Some(pos) = list.iter().position(|&b| b == block) else {
            return false;
        };
        let _ = list.remove(pos);
        true
    }

    /// First entry of `set`.
    pub fn head(&self, set: SetIndex) -> Option<BlockId> {
        self.get(set).first().copied()
    }

    /// Last entry of `set`.
    pub fn tail(&self, set: SetIndex) -> Option<BlockId> {
        self.get(set).last().copied()
    }

    /// Returns a deep copy of every list.
    pub fn snapshot(&self) -> OrderSnapshot {
        self.sets.clone()
    }

    /// Replaces every list with `state`.
    ///
    /// Returns `false` and leaves the table untouched if the set count differs.
    pub fn restore(&mut self, state: &OrderSnapshot) -> bool {
        if state.len() != self.sets.len() {
            return false;
        }
        self.sets.clone_from(state);
        true
    }

    /// Empties every list.
    pub fn reset(&mut self) {
        self.sets.iter_mut().for_each(Vec::clear);
    }
}
