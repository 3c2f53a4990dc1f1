//! Set-Associative Cache Model.
//!
//! This module implements the block-level cache model driven by the simulator.
//! It provides:
//! 1. **Store:** The set/way grid and the block-to-set mapping.
//! 2. **Policies:** LRU, MRU, and FIFO order tracking and victim selection.
//! 3. **Engine:** The single-access algorithm that keeps store and policy in step.

/// Cache replacement policy implementations (LRU, MRU, FIFO).
pub mod policies;

/// Set/way grid of resident blocks.
pub mod store;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use self::policies::{OrderSnapshot, ReplacementPolicy};
pub use self::store::{CacheGrid, CacheStore, CacheUsage, Lookup};
use crate::common::{BlockId, SetIndex};
use crate::config::CacheConfig;

/// Whether an access found its block resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    /// Block was resident.
    Hit,
    /// Block had to be loaded.
    Miss,
}

impl Outcome {
    /// Returns true for [`Outcome::Hit`].
    #[inline]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit)
    }
}

/// Effect of one access on the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessResult {
    /// Block accessed.
    pub block: BlockId,
    /// Set it maps to.
    pub set: SetIndex,
    /// Hit or miss.
    pub outcome: Outcome,
    /// Block evicted to make room, if any.
    pub evicted: Option<BlockId>,
    /// Human-readable account of the decision.
    pub explanation: String,
}

/// Paired deep copy of store grid and policy order, taken after a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineSnapshot {
    /// Cache grid, `[set][way]`.
    pub cache: CacheGrid,
    /// Replacement order per set, head first.
    pub order: OrderSnapshot,
}

/// Cache store and replacement policy, created and reset together.
///
/// Both share the same set count for their whole lifetime, and every set's
/// order list holds exactly the blocks resident in that set.
#[derive(Debug)]
pub struct CacheEngine {
    config: CacheConfig,
    store: CacheStore,
    policy: Box<dyn ReplacementPolicy>,
}

impl CacheEngine {
    /// Creates an empty cache with the geometry and policy of `config`.
    ///
    /// The configuration is assumed valid; see [`CacheConfig::validate`].
    pub fn new(config: &CacheConfig) -> Self {
        let config = config.normalized();
        let store = CacheStore::new(&config);
        let policy = policies::build(config.policy, store.num_sets());
        Self {
            config,
            store,
            policy,
        }
    }

    /// Normalized configuration the engine was built from.
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// The cache contents.
    pub const fn store(&self) -> &CacheStore {
        &self.store
    }

    /// The replacement policy.
    pub fn policy(&self) -> &dyn ReplacementPolicy {
        self.policy.as_ref()
    }

    /// Performs one access.
    ///
    /// A hit refreshes the policy. A miss fills an empty way if one exists;
    /// otherwise the policy's victim is removed from both structures before
    /// the new block is added. The new block is then recorded with the policy.
    pub fn access(&mut self, block: BlockId) -> AccessResult {
        let lookup = self.store.find(block);
        let set = lookup.set;

        if lookup.present {
            self.policy.record_access(block, set);
            debug!(block, set, way = ?lookup.way, "cache hit");
            return self.result(block, set, Outcome::Hit, None);
        }

        let mut evicted = None;
        if self.store.is_full(set) {
            if let Some(victim) = self.policy.choose_victim(set) {
                let _ = self.store.remove(victim, set);
                self.policy.forget(victim, set);
                trace!(victim, set, policy = %self.config.policy, "victim selected");
                evicted = Some(victim);
            }
        }

        if self.store.add(block, set) {
            self.policy.record_access(block, set);
        } else {
            warn!(block, set, "no free way after eviction; block not cached");
        }
        debug!(block, set, evicted = ?evicted, "cache miss");
        self.result(block, set, Outcome::Miss, evicted)
    }

    fn result(
        &self,
        block: BlockId,
        set: SetIndex,
        outcome: Outcome,
        evicted: Option<BlockId>,
    ) -> AccessResult {
        AccessResult {
            block,
            set,
            outcome,
            evicted,
            explanation: self.policy.explain(block, set, outcome.is_hit(), evicted),
        }
    }

    /// Returns deep copies of the grid and the policy order.
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            cache: self.store.snapshot(),
            order: self.policy.snapshot(),
        }
    }

    /// Restores both structures from `snapshot`.
    ///
    /// Returns `false` and changes nothing if the snapshot has another shape.
    pub fn restore(&mut self, snapshot: &EngineSnapshot) -> bool {
        let fits = snapshot.cache.len() == self.store.num_sets()
            && snapshot.order.len() == self.store.num_sets();
        if !fits {
            return false;
        }
        self.store.restore(&snapshot.cache) && self.policy.restore(&snapshot.order)
    }

    /// Empties both structures.
    pub fn reset(&mut self) {
        self.store.reset();
        self.policy.reset();
    }

    /// Replacement order of `set`, head first.
    pub fn order(&self, set: SetIndex) -> &[BlockId] {
        self.policy.order().get(set)
    }
}
