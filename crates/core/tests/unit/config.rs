//! Configuration Tests.
//!
//! Verifies defaults, mode normalization, the geometry guards, and JSON
//! parsing including the accepted field and variant aliases.

use pretty_assertions::assert_eq;
use rstest::rstest;

use cachestep_core::common::ConfigError;
use cachestep_core::config::{CacheConfig, MappingMode, ReplacementPolicy, SimConfig};

// ══════════════════════════════════════════════════════════
// 1. Defaults
// ══════════════════════════════════════════════════════════

#[test]
fn defaults_match_reference_setup() {
    let config = SimConfig::default();
    assert_eq!(config.cache.total_blocks, 8);
    assert_eq!(config.cache.ways, 4);
    assert_eq!(config.cache.line_size, 1);
    assert_eq!(config.cache.mapping, MappingMode::SetAssociative);
    assert_eq!(config.cache.policy, ReplacementPolicy::Lru);
    assert_eq!(config.timing.cache_latency, 1);
    assert_eq!(config.timing.memory_latency, 10);
    assert_eq!(config.memory_blocks, 1024);
    assert_eq!(config.random_count, 64);
    assert_eq!(config.auto_delay_ms, 1000);
    assert_eq!(config.validate(), Ok(()));
}

#[test]
fn policy_and_mapping_display() {
    assert_eq!(ReplacementPolicy::Lru.to_string(), "LRU");
    assert_eq!(ReplacementPolicy::Mru.to_string(), "MRU");
    assert_eq!(ReplacementPolicy::Fifo.to_string(), "FIFO");
    assert_eq!(MappingMode::FullyAssociative.to_string(), "fully-associative");
}

// ══════════════════════════════════════════════════════════
// 2. Normalization
// ══════════════════════════════════════════════════════════

#[test]
fn direct_mapping_forces_one_way() {
    let config = CacheConfig {
        ways: 4,
        ..CacheConfig::direct(16, 1)
    };
    assert_eq!(config.normalized().ways, 1);
    assert_eq!(config.num_sets(), 16);
}

#[test]
fn fully_associative_forces_single_set() {
    let config = CacheConfig {
        ways: 2,
        ..CacheConfig::fully_associative(16, 1)
    };
    assert_eq!(config.normalized().ways, 16);
    assert_eq!(config.num_sets(), 1);
}

#[rstest]
#[case(8, 4, 2)]
#[case(8, 1, 8)]
#[case(32, 8, 4)]
#[case(16, 16, 1)]
fn set_associative_set_count(#[case] blocks: usize, #[case] ways: usize, #[case] sets: usize) {
    assert_eq!(CacheConfig::set_associative(blocks, ways, 1).num_sets(), sets);
}

#[test]
fn zero_ways_never_yields_zero_sets() {
    let config = CacheConfig::set_associative(8, 0, 1);
    assert_eq!(config.effective_ways(), 1);
    assert_eq!(config.num_sets(), 8);
}

// ══════════════════════════════════════════════════════════
// 3. Validation
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(CacheConfig::set_associative(8, 4, 1))]
#[case(CacheConfig::set_associative(4, 4, 1))]
#[case(CacheConfig::set_associative(64, 1, 8))]
#[case(CacheConfig::direct(4, 1))]
#[case(CacheConfig::fully_associative(32, 2))]
#[case(CacheConfig { ways: 3, ..CacheConfig::direct(8, 1) })]
fn accepts_valid_geometry(#[case] config: CacheConfig) {
    assert_eq!(config.validate(), Ok(()));
}

#[rstest]
#[case(6, 2, 1, ConfigError::TotalBlocks { got: 6, min: 4 })]
#[case(2, 1, 1, ConfigError::TotalBlocks { got: 2, min: 4 })]
#[case(0, 1, 1, ConfigError::TotalBlocks { got: 0, min: 4 })]
#[case(8, 4, 3, ConfigError::LineSize { got: 3, min: 1 })]
#[case(8, 4, 0, ConfigError::LineSize { got: 0, min: 1 })]
#[case(8, 3, 1, ConfigError::Ways { ways: 3, total_blocks: 8 })]
#[case(8, 16, 1, ConfigError::Ways { ways: 16, total_blocks: 8 })]
#[case(8, 0, 1, ConfigError::Ways { ways: 0, total_blocks: 8 })]
fn rejects_invalid_geometry(
    #[case] blocks: usize,
    #[case] ways: usize,
    #[case] line: usize,
    #[case] expected: ConfigError,
) {
    assert_eq!(
        CacheConfig::set_associative(blocks, ways, line).validate(),
        Err(expected)
    );
}

#[test]
fn memory_smaller_than_cache_is_rejected() {
    let config = SimConfig {
        memory_blocks: 4,
        ..SimConfig::default()
    };
    assert_eq!(
        config.validate(),
        Err(ConfigError::MemoryBlocks {
            memory_blocks: 4,
            total_blocks: 8
        })
    );
}

#[test]
fn error_messages_name_the_rule() {
    let err = CacheConfig::set_associative(6, 2, 1).validate().unwrap_err();
    assert_eq!(
        err.to_string(),
        "cache blocks must be a power of 2 and at least 4 (got 6)"
    );
}

// ══════════════════════════════════════════════════════════
// 4. JSON
// ══════════════════════════════════════════════════════════

#[test]
fn empty_json_yields_defaults() {
    let config: SimConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, SimConfig::default());
}

#[test]
fn blocks_per_set_alias_and_lowercase_variants() {
    let json = r#"{
        "total_blocks": 16,
        "blocksPerSet": 2,
        "lineSize": 4,
        "mapping": "direct",
        "policy": "fifo"
    }"#;
    let config: CacheConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.ways, 2);
    assert_eq!(config.line_size, 4);
    assert_eq!(config.mapping, MappingMode::Direct);
    assert_eq!(config.policy, ReplacementPolicy::Fifo);
}

#[test]
fn unknown_policy_is_a_parse_error() {
    let json = r#"{ "policy": "RANDOM" }"#;
    assert!(serde_json::from_str::<CacheConfig>(json).is_err());
}
