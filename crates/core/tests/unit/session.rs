//! Session Tests.
//!
//! Exercises the command boundary: ordering errors, configuration rejection,
//! JSON commands, auto-advance cancellation, and the rendered state.

use pretty_assertions::assert_eq;

use cachestep_core::Session;
use cachestep_core::common::{ConfigError, SessionError};
use cachestep_core::config::{CacheConfig, SimConfig};
use cachestep_core::session::{Command, CommandOutcome};
use cachestep_core::sim::{CustomInput, Phase, TestCase};

use crate::common::init_tracing;

fn custom(text: &str) -> TestCase {
    TestCase::Custom {
        input: CustomInput::Text(text.to_string()),
    }
}

fn loaded(text: &str) -> Session {
    init_tracing();
    let mut session = Session::with_seed(1);
    session.init(SimConfig::default()).unwrap();
    let _ = session.load(&custom(text)).unwrap();
    session
}

// ══════════════════════════════════════════════════════════
// 1. Command ordering
// ══════════════════════════════════════════════════════════

#[test]
fn commands_before_init_are_rejected() {
    let mut session = Session::with_seed(0);
    assert_eq!(session.next(), Err(SessionError::NotInitialized));
    assert_eq!(session.prev(), Err(SessionError::NotInitialized));
    assert_eq!(session.run_all(), Err(SessionError::NotInitialized));
    assert_eq!(session.toggle_auto(), Err(SessionError::NotInitialized));
    assert!(session.load(&custom("1")).is_err());
    assert!(session.state().simulation.is_none());
}

#[test]
fn stepping_before_load_is_rejected() {
    let mut session = Session::with_seed(0);
    session.init(SimConfig::default()).unwrap();
    assert_eq!(session.next(), Err(SessionError::NoSequence));
    assert_eq!(session.toggle_auto(), Err(SessionError::NoSequence));
}

#[test]
fn invalid_config_keeps_previous_simulator() {
    let mut session = loaded("0 1 2");
    let _ = session.next().unwrap();

    let bad = SimConfig::with_cache(CacheConfig::set_associative(6, 2, 1));
    assert_eq!(
        session.init(bad),
        Err(SessionError::Config(ConfigError::TotalBlocks { got: 6, min: 4 }))
    );
    assert_eq!(session.simulator().unwrap().cursor(), 1);
}

#[test]
fn rejected_init_leaves_auto_running() {
    let mut session = loaded("0 1 2 3");
    assert_eq!(session.toggle_auto(), Ok(true));

    let bad = SimConfig::with_cache(CacheConfig::set_associative(6, 2, 1));
    assert!(session.init(bad).is_err());
    assert!(session.auto().is_enabled());
    assert!(session.tick());

    session.init(SimConfig::default()).unwrap();
    assert!(!session.auto().is_enabled());
}

#[test]
fn init_replaces_simulator() {
    let mut session = loaded("0 1 2");
    session
        .init(SimConfig::with_cache(CacheConfig::direct(4, 1)))
        .unwrap();
    let sim = session.simulator().unwrap();
    assert_eq!(sim.phase(), Phase::Uninitialized);
    assert_eq!(sim.engine().store().num_sets(), 4);
}

#[test]
fn next_and_prev_report_boundaries() {
    let mut session = loaded("5");
    assert_eq!(session.prev(), Ok(false));
    assert_eq!(session.next(), Ok(true));
    assert_eq!(session.next(), Ok(false));
    assert_eq!(session.prev(), Ok(true));
    assert_eq!(session.prev(), Ok(false));
}

#[test]
fn reset_before_init_is_harmless() {
    let mut session = Session::with_seed(0);
    session.reset();
    assert!(session.simulator().is_none());
}

// ══════════════════════════════════════════════════════════
// 2. JSON commands
// ══════════════════════════════════════════════════════════

#[test]
fn json_command_script() {
    let mut session = Session::with_seed(3);
    let script = [
        r#"{ "command": "init", "config": { "cache": { "total_blocks": 4, "blocksPerSet": 1 } } }"#,
        r#"{ "command": "load", "testCase": { "kind": "custom", "input": [0, 1, 0, 2, 0, 3, 0, 4] } }"#,
        r#"{ "command": "next" }"#,
        r#"{ "command": "runAll" }"#,
        r#"{ "command": "prev" }"#,
        r#"{ "command": "setAutoDelay", "ms": 250 }"#,
    ];
    let outcomes: Vec<CommandOutcome> = script
        .iter()
        .map(|line| {
            let command: Command = serde_json::from_str(line).unwrap();
            session.apply(command).unwrap()
        })
        .collect();

    assert_eq!(
        outcomes,
        vec![
            CommandOutcome::Initialized,
            CommandOutcome::Loaded { len: 8 },
            CommandOutcome::Stepped { advanced: true },
            CommandOutcome::Ran { steps: 7 },
            CommandOutcome::SteppedBack { rewound: true },
            CommandOutcome::AutoDelaySet { ms: 250 },
        ]
    );
    let state = session.state();
    assert_eq!(state.auto.delay_ms, 250);
    let sim = state.simulation.unwrap();
    assert_eq!(sim.stats.hits, 3);
    assert_eq!(sim.stats.misses, 4);
}

#[test]
fn init_without_config_uses_defaults() {
    let command: Command = serde_json::from_str(r#"{ "command": "init" }"#).unwrap();
    assert_eq!(
        command,
        Command::Init {
            config: SimConfig::default()
        }
    );
}

#[test]
fn unknown_command_fails_to_parse() {
    assert!(serde_json::from_str::<Command>(r#"{ "command": "jump" }"#).is_err());
}

#[test]
fn outcome_serializes_with_tag() {
    let json = serde_json::to_value(CommandOutcome::Ran { steps: 4 }).unwrap();
    assert_eq!(json, serde_json::json!({ "result": "ran", "steps": 4 }));
}

#[test]
fn seeded_random_load_is_reproducible() {
    let load = |seed| {
        let mut session = Session::with_seed(seed);
        session.init(SimConfig::default()).unwrap();
        session
            .load(&TestCase::Random { count: Some(16) })
            .unwrap()
            .to_vec()
    };
    assert_eq!(load(9), load(9));
}

#[test]
fn load_with_huge_n_is_clipped() {
    let mut session = Session::with_seed(0);
    session.init(SimConfig::default()).unwrap();
    let command: Command = serde_json::from_str(
        r#"{ "command": "load", "test_case": { "kind": "mid-repeat", "num_blocks": 10000000000 } }"#,
    )
    .unwrap();
    assert_eq!(
        session.apply(command),
        Ok(CommandOutcome::Loaded { len: (1024 + 1023) * 2 })
    );

    let len = session
        .load(&TestCase::Sequential {
            num_blocks: usize::MAX,
        })
        .unwrap()
        .len();
    assert_eq!(len, 2048);
}

#[test]
fn load_accepts_mixed_custom_list() {
    let mut session = Session::with_seed(0);
    session.init(SimConfig::default()).unwrap();
    let command: Command = serde_json::from_str(
        r#"{ "command": "load", "test_case": { "kind": "custom", "input": [1, 2.5, "3", "x"] } }"#,
    )
    .unwrap();
    assert_eq!(session.apply(command), Ok(CommandOutcome::Loaded { len: 3 }));
    assert_eq!(session.simulator().unwrap().sequence(), &[1, 2, 3]);
}

// ══════════════════════════════════════════════════════════
// 3. Auto-advance
// ══════════════════════════════════════════════════════════

#[test]
fn manual_command_cancels_auto() {
    let mut session = loaded("0 1 2 3");
    assert_eq!(session.toggle_auto(), Ok(true));
    assert!(session.tick());
    assert_eq!(session.next(), Ok(true));
    assert!(!session.auto().is_enabled());
    assert!(!session.tick());
    assert_eq!(session.simulator().unwrap().cursor(), 2);
}

#[test]
fn run_auto_finishes_sequence() {
    let mut session = loaded("0 1 2 3 4 5");
    session.set_auto_delay(5);
    let _ = session.toggle_auto().unwrap();
    let mut slept = 0;
    let steps = session.run_auto(|_| slept += 1);
    assert_eq!(steps, 6);
    assert_eq!(slept, 5);
    assert_eq!(session.simulator().unwrap().phase(), Phase::Complete);
    assert!(!session.state().auto.enabled);
}

#[test]
fn tick_without_simulator_is_noop() {
    let mut session = Session::with_seed(0);
    assert!(!session.tick());
    assert_eq!(session.run_auto(|_| {}), 0);
}

// ══════════════════════════════════════════════════════════
// 4. Reference scenario
// ══════════════════════════════════════════════════════════

/// 8 blocks, 4 ways, sequential N = 8: the run is `0..16` twice, so every
/// pass streams eight blocks through each four-way set and LRU never hits.
#[test]
fn sequential_scenario_by_trace() {
    let mut session = Session::with_seed(0);
    session
        .init(SimConfig::with_cache(CacheConfig::set_associative(8, 4, 1)))
        .unwrap();
    let len = session
        .load(&TestCase::Sequential { num_blocks: 8 })
        .unwrap()
        .len();
    assert_eq!(len, 32);
    assert_eq!(session.run_all(), Ok(32));

    let state = session.state().simulation.unwrap();
    assert_eq!(state.phase, Phase::Complete);
    assert_eq!(state.stats.hits, 0);
    assert_eq!(state.stats.misses, 32);
    assert_eq!(
        state.cache_grid,
        vec![
            vec![Some(8), Some(10), Some(12), Some(14)],
            vec![Some(9), Some(11), Some(13), Some(15)],
        ]
    );
}
