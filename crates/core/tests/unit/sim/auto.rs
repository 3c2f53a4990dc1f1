//! Auto-Advance Tests.

use std::time::Duration;

use pretty_assertions::assert_eq;

use cachestep_core::config::CacheConfig;
use cachestep_core::sim::AutoAdvance;

use crate::common::simulator;

#[test]
fn starts_disabled_and_ticks_do_nothing() {
    let mut sim = simulator(CacheConfig::default());
    sim.load(vec![1, 2, 3]);
    let mut auto = AutoAdvance::new(Duration::from_millis(10));
    assert!(!auto.is_enabled());
    assert!(!auto.tick(&mut sim));
    assert_eq!(sim.cursor(), 0);
}

#[test]
fn toggle_flips_state() {
    let mut sim = simulator(CacheConfig::default());
    sim.load(vec![1, 2, 3]);
    let mut auto = AutoAdvance::new(Duration::ZERO);
    assert!(auto.toggle(&sim));
    assert!(auto.is_enabled());
    assert!(!auto.toggle(&sim));
    assert!(!auto.is_enabled());
}

#[test]
fn toggle_refuses_finished_run() {
    let mut sim = simulator(CacheConfig::default());
    assert!(!AutoAdvance::new(Duration::ZERO).toggle(&sim));

    sim.load(vec![1]);
    let _ = sim.run_all();
    let mut auto = AutoAdvance::new(Duration::ZERO);
    assert!(!auto.toggle(&sim));
}

#[test]
fn tick_steps_once_and_stops_at_end() {
    let mut sim = simulator(CacheConfig::default());
    sim.load(vec![1, 2]);
    let mut auto = AutoAdvance::new(Duration::ZERO);
    let _ = auto.toggle(&sim);

    assert!(auto.tick(&mut sim));
    assert_eq!(sim.cursor(), 1);
    assert!(auto.is_enabled());

    assert!(auto.tick(&mut sim));
    assert_eq!(sim.cursor(), 2);
    assert!(!auto.is_enabled());

    assert!(!auto.tick(&mut sim));
    assert_eq!(sim.cursor(), 2);
}

#[test]
fn cancel_stops_further_ticks() {
    let mut sim = simulator(CacheConfig::default());
    sim.load(vec![1, 2, 3]);
    let mut auto = AutoAdvance::new(Duration::ZERO);
    let _ = auto.toggle(&sim);
    assert!(auto.tick(&mut sim));
    auto.cancel();
    assert!(!auto.tick(&mut sim));
    assert_eq!(sim.cursor(), 1);
}

#[test]
fn run_sleeps_between_steps_only() {
    let mut sim = simulator(CacheConfig::default());
    sim.load(vec![0, 1, 2, 3, 4]);
    let mut auto = AutoAdvance::new(Duration::from_millis(250));
    let _ = auto.toggle(&sim);

    let mut sleeps = Vec::new();
    let steps = auto.run(&mut sim, |d| sleeps.push(d));
    assert_eq!(steps, 5);
    assert_eq!(sleeps, vec![Duration::from_millis(250); 4]);
    assert!(sim.is_complete());
    assert!(!auto.is_enabled());
}

#[test]
fn delay_change_applies_to_next_sleep() {
    let mut auto = AutoAdvance::new(Duration::from_millis(1000));
    auto.set_delay(Duration::from_millis(100));
    assert_eq!(auto.delay(), Duration::from_millis(100));
}
