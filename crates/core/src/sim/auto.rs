//! Timer-driven auto-advance.
//!
//! The driver never owns a timer: the host calls [`AutoAdvance::tick`] when its
//! timer fires, or hands [`AutoAdvance::run`] a sleep function. Each tick runs
//! at most one whole step. The driver disables itself when the run completes,
//! and ticks that arrive while disabled do nothing, so nothing is ever queued.

use std::time::Duration;

use tracing::debug;

use super::simulator::Simulator;

/// Auto-advance switch and delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoAdvance {
    enabled: bool,
    delay: Duration,
}

impl AutoAdvance {
    /// Creates a disabled driver with the given tick delay.
    pub const fn new(delay: Duration) -> Self {
        Self {
            enabled: false,
            delay,
        }
    }

    /// Whether ticks currently advance the simulation.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Delay between ticks.
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Changes the delay; takes effect from the next tick.
    pub const fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Flips the switch and returns the new state.
    ///
    /// Enabling is refused (returns `false`) when `sim` has nothing left to run.
    pub fn toggle(&mut self, sim: &Simulator) -> bool {
        self.enabled = !self.enabled && !sim.is_complete();
        debug!(enabled = self.enabled, "auto-advance toggled");
        self.enabled
    }

    /// Stops auto-advance immediately.
    pub const fn cancel(&mut self) {
        self.enabled = false;
    }

    /// Handles one timer tick: runs one step if enabled.
    ///
    /// Returns `true` if a step ran. Disables itself once `sim` completes.
    pub fn tick(&mut self, sim: &mut Simulator) -> bool {
        if !self.enabled {
            return false;
        }
        let stepped = sim.step().is_some();
        if !stepped || sim.is_complete() {
            self.enabled = false;
            debug!("auto-advance finished");
        }
        stepped
    }

    /// Ticks until disabled, calling `sleep(delay)` between ticks.
    ///
    /// Returns the number of steps run.
    pub fn run<F: FnMut(Duration)>(&mut self, sim: &mut Simulator, mut sleep: F) -> usize {
        let mut steps = 0;
        while self.tick(sim) {
            steps += 1;
            if self.enabled {
                sleep(self.delay);
            }
        }
        steps
    }
}
