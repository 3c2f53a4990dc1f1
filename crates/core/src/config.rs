//! Configuration system for the cache simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline cache geometry, latencies, and memory size.
//! 2. **Structures:** Cache geometry, timing model, and the root simulation config.
//! 3. **Enums:** Mapping mode and replacement policy selectors.
//! 4. **Validation:** The guard rules a front end applies before building an engine.
//!
//! Configuration is supplied as JSON by a front end, or use `SimConfig::default()`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    /// Default number of blocks the cache holds.
    pub const TOTAL_BLOCKS: usize = 8;

    /// Default associativity (4-way).
    pub const WAYS: usize = 4;

    /// Default line size in words.
    pub const LINE_SIZE: usize = 1;

    /// Cache access latency in ns.
    pub const CACHE_LATENCY: u64 = 1;

    /// Main memory access latency in ns, per word.
    pub const MEMORY_LATENCY: u64 = 10;

    /// Number of addressable memory blocks.
    ///
    /// Bounds every block id: `0 <= id < MEMORY_BLOCKS`.
    pub const MEMORY_BLOCKS: u64 = 1024;

    /// Length of a generated random test sequence.
    pub const RANDOM_COUNT: usize = 64;

    /// Delay between auto-advance ticks in milliseconds.
    pub const AUTO_DELAY_MS: u64 = 1000;
}

/// Smallest cache accepted by [`CacheConfig::validate`], in blocks.
pub const MIN_TOTAL_BLOCKS: usize = 4;

/// Smallest line accepted by [`CacheConfig::validate`], in words.
pub const MIN_LINE_SIZE: usize = 1;

/// How block ids are mapped onto cache sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingMode {
    /// One way per set; each block has exactly one candidate slot.
    #[serde(alias = "Direct")]
    Direct,
    /// `ways` slots per set; `set = block mod sets`.
    #[default]
    #[serde(alias = "SetAssociative", alias = "set_associative")]
    SetAssociative,
    /// A single set spanning the whole cache.
    #[serde(alias = "FullyAssociative", alias = "fully_associative")]
    FullyAssociative,
}

impl fmt::Display for MappingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Direct => "direct",
            Self::SetAssociative => "set-associative",
            Self::FullyAssociative => "fully-associative",
        };
        f.write_str(name)
    }
}

/// Cache replacement policy algorithms.
///
/// Specifies the algorithm used to select which block to evict
/// when a new block must be installed in a full set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used replacement policy.
    ///
    /// Evicts the block that was touched least recently.
    #[default]
    #[serde(alias = "Lru", alias = "lru")]
    Lru,
    /// Most Recently Used replacement policy.
    ///
    /// Evicts the block that was touched most recently.
    #[serde(alias = "Mru", alias = "mru")]
    Mru,
    /// First In First Out replacement policy.
    ///
    /// Evicts the block that entered the set first; hits do not reorder.
    #[serde(alias = "Fifo", alias = "fifo")]
    Fifo,
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lru => "LRU",
            Self::Mru => "MRU",
            Self::Fifo => "FIFO",
        };
        f.write_str(name)
    }
}

/// Cache geometry and policy selection.
///
/// `ways` may also be supplied as `blocks_per_set`. For `Direct` mapping the
/// effective associativity is always 1, and for `FullyAssociative` it is
/// always `total_blocks`; see [`CacheConfig::normalized`].
///
/// # Examples
///
/// ```
/// use cachestep_core::config::{CacheConfig, MappingMode, ReplacementPolicy};
///
/// let json = r#"{
///     "total_blocks": 16,
///     "blocks_per_set": 4,
///     "line_size": 2,
///     "mapping": "set-associative",
///     "policy": "FIFO"
/// }"#;
///
/// let config: CacheConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.ways, 4);
/// assert_eq!(config.num_sets(), 4);
/// assert_eq!(config.policy, ReplacementPolicy::Fifo);
/// assert_eq!(config.mapping, MappingMode::SetAssociative);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache capacity in blocks
    #[serde(default = "CacheConfig::default_total_blocks")]
    pub total_blocks: usize,

    /// Associativity (blocks per set)
    #[serde(
        default = "CacheConfig::default_ways",
        alias = "blocks_per_set",
        alias = "blocksPerSet"
    )]
    pub ways: usize,

    /// Words per cache line; scales the miss penalty
    #[serde(default = "CacheConfig::default_line_size", alias = "lineSize")]
    pub line_size: usize,

    /// Block-to-set mapping
    #[serde(default, alias = "mappingMode")]
    pub mapping: MappingMode,

    /// Replacement policy
    #[serde(default, alias = "replacementMode")]
    pub policy: ReplacementPolicy,
}

impl CacheConfig {
    /// Returns the default cache capacity in blocks.
    fn default_total_blocks() -> usize {
        defaults::TOTAL_BLOCKS
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::WAYS
    }

    /// Returns the default line size in words.
    fn default_line_size() -> usize {
        defaults::LINE_SIZE
    }

    /// Creates a set-associative configuration with the default (LRU) policy.
    pub fn set_associative(total_blocks: usize, ways: usize, line_size: usize) -> Self {
        Self {
            total_blocks,
            ways,
            line_size,
            mapping: MappingMode::SetAssociative,
            policy: ReplacementPolicy::default(),
        }
    }

    /// Creates a direct-mapped configuration (one way per set).
    pub fn direct(total_blocks: usize, line_size: usize) -> Self {
        Self {
            total_blocks,
            ways: 1,
            line_size,
            mapping: MappingMode::Direct,
            policy: ReplacementPolicy::default(),
        }
    }

    /// Creates a fully-associative configuration (a single set).
    pub fn fully_associative(total_blocks: usize, line_size: usize) -> Self {
        Self {
            total_blocks,
            ways: total_blocks,
            line_size,
            mapping: MappingMode::FullyAssociative,
            policy: ReplacementPolicy::default(),
        }
    }

    /// Returns the configuration with `policy` selected.
    #[must_use]
    pub const fn with_policy(mut self, policy: ReplacementPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the configuration with `ways` forced to agree with the mapping mode.
    #[must_use]
    pub const fn normalized(mut self) -> Self {
        match self.mapping {
            MappingMode::Direct => self.ways = 1,
            MappingMode::FullyAssociative => self.ways = self.total_blocks,
            MappingMode::SetAssociative => {}
        }
        self
    }

    /// Effective associativity after normalization (never zero).
    pub const fn effective_ways(&self) -> usize {
        let ways = self.normalized().ways;
        if ways == 0 { 1 } else { ways }
    }

    /// Number of sets the cache is divided into (never zero).
    pub const fn num_sets(&self) -> usize {
        let sets = self.total_blocks / self.effective_ways();
        if sets == 0 { 1 } else { sets }
    }

    /// Checks the geometry a front end must enforce before building an engine.
    ///
    /// # Errors
    ///
    /// Returns the first rule the (normalized) configuration breaks:
    /// power-of-two block count of at least [`MIN_TOTAL_BLOCKS`], power-of-two
    /// line size of at least [`MIN_LINE_SIZE`], and ways equal to 1 or a power
    /// of two dividing the block count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let config = self.normalized();

        if !config.total_blocks.is_power_of_two() || config.total_blocks < MIN_TOTAL_BLOCKS {
            return Err(ConfigError::TotalBlocks {
                got: config.total_blocks,
                min: MIN_TOTAL_BLOCKS,
            });
        }
        if !config.line_size.is_power_of_two() || config.line_size < MIN_LINE_SIZE {
            return Err(ConfigError::LineSize {
                got: config.line_size,
                min: MIN_LINE_SIZE,
            });
        }
        let ways_ok = config.ways == 1
            || (config.ways.is_power_of_two()
                && config.ways <= config.total_blocks
                && config.total_blocks % config.ways == 0);
        if !ways_ok {
            return Err(ConfigError::Ways {
                ways: config.ways,
                total_blocks: config.total_blocks,
            });
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    /// 8 blocks, 4-way set-associative, 1-word lines, LRU.
    fn default() -> Self {
        Self::set_associative(
            defaults::TOTAL_BLOCKS,
            defaults::WAYS,
            defaults::LINE_SIZE,
        )
    }
}

/// Latency model used for access-time statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Cache access time (hit cost)
    #[serde(default = "TimingConfig::default_cache_latency")]
    pub cache_latency: u64,

    /// Memory access time per word (scaled by line size on a miss)
    #[serde(default = "TimingConfig::default_memory_latency")]
    pub memory_latency: u64,
}

impl TimingConfig {
    /// Returns the default cache access latency.
    fn default_cache_latency() -> u64 {
        defaults::CACHE_LATENCY
    }

    /// Returns the default memory access latency.
    fn default_memory_latency() -> u64 {
        defaults::MEMORY_LATENCY
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            cache_latency: defaults::CACHE_LATENCY,
            memory_latency: defaults::MEMORY_LATENCY,
        }
    }
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// ```
/// use cachestep_core::config::{ReplacementPolicy, SimConfig};
///
/// let config = SimConfig::default();
/// assert_eq!(config.memory_blocks, 1024);
/// assert_eq!(config.timing.memory_latency, 10);
///
/// let json = r#"{ "cache": { "total_blocks": 32, "ways": 8, "policy": "MRU" } }"#;
/// let config: SimConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.cache.num_sets(), 4);
/// assert_eq!(config.cache.policy, ReplacementPolicy::Mru);
/// assert_eq!(config.random_count, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Cache geometry and policy
    #[serde(default)]
    pub cache: CacheConfig,

    /// Latency model for statistics
    #[serde(default)]
    pub timing: TimingConfig,

    /// Number of addressable memory blocks (upper bound on block ids)
    #[serde(default = "SimConfig::default_memory_blocks")]
    pub memory_blocks: u64,

    /// Length of generated random sequences
    #[serde(default = "SimConfig::default_random_count")]
    pub random_count: usize,

    /// Auto-advance delay in milliseconds
    #[serde(default = "SimConfig::default_auto_delay_ms")]
    pub auto_delay_ms: u64,
}

impl SimConfig {
    /// Returns the default addressable memory size in blocks.
    fn default_memory_blocks() -> u64 {
        defaults::MEMORY_BLOCKS
    }

    /// Returns the default random sequence length.
    fn default_random_count() -> usize {
        defaults::RANDOM_COUNT
    }

    /// Returns the default auto-advance delay.
    fn default_auto_delay_ms() -> u64 {
        defaults::AUTO_DELAY_MS
    }

    /// Creates a configuration around `cache`, keeping every other default.
    pub fn with_cache(cache: CacheConfig) -> Self {
        Self {
            cache,
            ..Self::default()
        }
    }

    /// Validates the cache geometry and the memory size.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`CacheConfig::validate`], or
    /// [`ConfigError::MemoryBlocks`] when memory is smaller than the cache.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cache.validate()?;
        if self.memory_blocks < self.cache.total_blocks as u64 {
            return Err(ConfigError::MemoryBlocks {
                memory_blocks: self.memory_blocks,
                total_blocks: self.cache.total_blocks,
            });
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            timing: TimingConfig::default(),
            memory_blocks: defaults::MEMORY_BLOCKS,
            random_count: defaults::RANDOM_COUNT,
            auto_delay_ms: defaults::AUTO_DELAY_MS,
        }
    }
}
