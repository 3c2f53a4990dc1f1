//! Set/way grid of resident block ids.
//!
//! The store answers membership and capacity questions and performs the raw
//! add/remove mutations. It knows nothing about replacement order; the engine
//! keeps the policy's order list in step with it.
//!
//! A block only ever lives in the set it maps to, so lookups scan a single set.
//! Slots are positional: a new block takes the lowest empty way and removing a
//! block leaves a hole rather than shifting its neighbors.

use serde::Serialize;

use crate::common::{BlockId, SetIndex};
use crate::config::{CacheConfig, MappingMode};

/// Deep copy of the full grid, `[set][way]`, with `None` for empty slots.
pub type CacheGrid = Vec<Vec<Option<BlockId>>>;

/// Result of [`CacheStore::find`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Lookup {
    /// Whether the block is resident.
    pub present: bool,
    /// Set the block maps to (looked up regardless of presence).
    pub set: SetIndex,
    /// Way holding the block, if present.
    pub way: Option<usize>,
}

/// Occupancy report for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheUsage {
    /// Occupied slots across all sets.
    pub resident_blocks: usize,
    /// Number of sets.
    pub sets: usize,
    /// Slots per set.
    pub ways: usize,
    /// Words per line.
    pub line_size: usize,
    /// Occupied slots as a percentage of capacity.
    pub utilization: f64,
}

/// Cache contents as a grid of optional block ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStore {
    sets: CacheGrid,
    ways: usize,
    line_size: usize,
    mapping: MappingMode,
}

impl CacheStore {
    /// Creates an empty store shaped by `config` (after normalization).
    pub fn new(config: &CacheConfig) -> Self {
        let ways = config.effective_ways();
        Self {
            sets: vec![vec![None; ways]; config.num_sets()],
            ways,
            line_size: config.line_size,
            mapping: config.mapping,
        }
    }

    /// Number of sets.
    #[inline]
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Slots per set.
    #[inline]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Words per line.
    #[inline]
    pub const fn line_size(&self) -> usize {
        self.line_size
    }

    /// Mapping mode the store was built with.
    #[inline]
    pub const fn mapping(&self) -> MappingMode {
        self.mapping
    }

    /// Computes the set a block maps to.
    ///
    /// `block mod sets` for direct and set-associative caches; a
    /// fully-associative cache has one set, so everything maps to 0.
    #[inline]
    pub fn map_to_set(&self, block: BlockId) -> SetIndex {
        match self.mapping {
            MappingMode::FullyAssociative => 0,
            MappingMode::Direct | MappingMode::SetAssociative => {
                (block % self.sets.len() as u64) as SetIndex
            }
        }
    }

    /// Looks `block` up in the set it maps to. Other sets are never scanned.
    pub fn find(&self, block: BlockId) -> Lookup {
        let set = self.map_to_set(block);
        let way = self.sets[set].iter().position(|slot| *slot == Some(block));
        Lookup {
            present: way.is_some(),
            set,
            way,
        }
    }

    /// Returns true if every slot of `set` is occupied.
    ///
    /// An out-of-range set reports full, so callers never try to fill it.
    pub fn is_full(&self, set: SetIndex) -> bool {
        self.sets
            .get(set)
            .is_none_or(|slots| slots.iter().all(Option::is_some))
    }

    /// Number of occupied slots in `set` (0 for an out-of-range set).
    pub fn occupied(&self, set: SetIndex) -> usize {
        self.sets
            .get(set)
            .map_or(0, |slots| slots.iter().flatten().count())
    }

    /// Resident blocks of `set` in way order.
    pub fn resident(&self, set: SetIndex) -> impl Iterator<Item = BlockId> + '_ {
        self.sets.get(set).into_iter().flatten().flatten().copied()
    }

    /// Number of occupied slots across the whole cache.
    pub fn resident_count(&self) -> usize {
        self.sets.iter().flatten().flatten().count()
    }

    /// Places `block` in the lowest empty way of `set`.
    ///
    /// Returns `false` without mutating anything if the set is full. The
    /// caller is responsible for checking `find` first; duplicates are not
    /// detected here.
    pub fn add(&mut self, block: BlockId, set: SetIndex) -> bool {
        let Some(slot) = self
            .sets
            .get_mut(set)
            .and_then(|slots| slots.iter_mut().find(|slot| slot.is_none()))
        else {
            return false;
        };
        *slot = Some(block);
        true
    }

    /// Frees the slot holding `block` in `set`. Returns `false` if absent.
    pub fn remove(&mut self, block: BlockId, set: SetIndex) -> bool {
        let Some(slot) = self
            .sets
            .get_mut(set)
            .and_then(|slots| slots.iter_mut().find(|slot| **slot == Some(block)))
        else {
            return false;
        };
        *slot = None;
        true
    }

    /// Returns a deep copy of the grid.
    pub fn snapshot(&self) -> CacheGrid {
        self.sets.clone()
    }

    /// Replaces the grid with `grid`.
    ///
    /// Returns `false` and leaves the store untouched if `grid` does not have
    /// this store's shape.
    pub fn restore(&mut self, grid: &CacheGrid) -> bool {
        let same_shape = grid.len() == self.sets.len()
            && grid.iter().all(|slots| slots.len() == self.ways);
        if same_shape {
            self.sets.clone_from(grid);
        }
        same_shape
    }

    /// Empties every set, keeping the geometry.
    pub fn reset(&mut self) {
        for slot in self.sets.iter_mut().flatten() {
            *slot = None;
        }
    }

    /// Reports occupancy.
    pub fn usage(&self) -> CacheUsage {
        let capacity = self.sets.len() * self.ways;
        let resident_blocks = self.resident_count();
        let utilization = if capacity == 0 {
            0.0
        } else {
            resident_blocks as f64 / capacity as f64 * 100.0
        };
        CacheUsage {
            resident_blocks,
            sets: self.sets.len(),
            ways: self.ways,
            line_size: self.line_size,
            utilization,
        }
    }
}
