//! Command-driven simulation session.
//!
//! A [`Session`] is the single owner of all mutable simulation state. User
//! interfaces feed it [`Command`]s and render the [`SessionState`] it returns.
//! Any accepted manual command cancels auto-advance before it takes effect, so
//! a timer tick can never interleave with a manual step.
//!
//! Commands deserialize from JSON:
//!
//! ```
//! use cachestep_core::session::{Command, Session};
//!
//! let mut session = Session::with_seed(7);
//! for line in [
//!     r#"{ "command": "init", "config": { "cache": { "total_blocks": 4, "ways": 4, "policy": "MRU" } } }"#,
//!     r#"{ "command": "load", "test_case": { "kind": "custom", "input": "0 1 2 3 5" } }"#,
//!     r#"{ "command": "runAll" }"#,
//! ] {
//!     let command: Command = serde_json::from_str(line).unwrap();
//!     session.apply(command).unwrap();
//! }
//! let last = session.simulator().unwrap().log().last().unwrap();
//! assert_eq!(last.evicted, Some(3));
//! ```

use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::common::{BlockId, SessionError};
use crate::config::SimConfig;
use crate::sim::{AutoAdvance, Phase, SimState, Simulator, TestCase};

/// A user command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    /// Build a fresh cache from `config`.
    Init {
        /// Simulation settings.
        #[serde(default)]
        config: SimConfig,
    },
    /// Generate and load a test sequence.
    Load {
        /// Sequence to generate.
        #[serde(alias = "testCase")]
        test_case: TestCase,
    },
    /// Run one access.
    Next,
    /// Undo one access.
    Prev,
    /// Run every remaining access.
    RunAll,
    /// Rewind to an empty cache, keeping the sequence.
    Reset,
    /// Turn auto-advance on or off.
    ToggleAuto,
    /// Change the auto-advance delay.
    SetAutoDelay {
        /// Delay in milliseconds.
        ms: u64,
    },
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandOutcome {
    /// A new cache was built.
    Initialized,
    /// A sequence of `len` accesses was loaded.
    Loaded {
        /// Sequence length.
        len: usize,
    },
    /// `next`: whether a step ran.
    Stepped {
        /// False at the end of the sequence.
        advanced: bool,
    },
    /// `prev`: whether a step was undone.
    SteppedBack {
        /// False at the start of the sequence.
        rewound: bool,
    },
    /// `runAll`: number of steps run.
    Ran {
        /// Steps run.
        steps: usize,
    },
    /// The run was rewound.
    Reset,
    /// Auto-advance switched.
    AutoToggled {
        /// New state.
        enabled: bool,
    },
    /// Auto-advance delay changed.
    AutoDelaySet {
        /// New delay in milliseconds.
        ms: u64,
    },
}

/// Auto-advance status for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AutoStatus {
    /// Whether auto-advance is running.
    pub enabled: bool,
    /// Delay between ticks in milliseconds.
    pub delay_ms: u64,
}

/// Everything a user interface renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionState {
    /// Simulation state, `None` before `init`.
    pub simulation: Option<SimState>,
    /// Auto-advance status.
    pub auto: AutoStatus,
}

/// Owner of the simulator, the auto-advance driver, and the random source.
#[derive(Debug)]
pub struct Session {
    sim: Option<Simulator>,
    auto: AutoAdvance,
    rng: StdRng,
}

#[cfg(feature = "os-rng")]
impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session seeded from the OS.
    #[cfg(feature = "os-rng")]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates an empty session with a deterministic random source.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let delay = Duration::from_millis(SimConfig::default().auto_delay_ms);
        Self {
            sim: None,
            auto: AutoAdvance::new(delay),
            rng,
        }
    }

    /// The simulator, once initialized.
    pub const fn simulator(&self) -> Option<&Simulator> {
        self.sim.as_ref()
    }

    /// The auto-advance driver.
    pub const fn auto(&self) -> &AutoAdvance {
        &self.auto
    }

    /// Applies one command.
    ///
    /// # Errors
    ///
    /// See the individual command methods.
    pub fn apply(&mut self, command: Command) -> Result<CommandOutcome, SessionError> {
        match command {
            Command::Init { config } => self.init(config).map(|()| CommandOutcome::Initialized),
            Command::Load { test_case } => self
                .load(&test_case)
                .map(|seq| CommandOutcome::Loaded { len: seq.len() }),
            Command::Next => self
                .next()
                .map(|advanced| CommandOutcome::Stepped { advanced }),
            Command::Prev => self
                .prev()
                .map(|rewound| CommandOutcome::SteppedBack { rewound }),
            Command::RunAll => self.run_all().map(|steps| CommandOutcome::Ran { steps }),
            Command::Reset => {
                self.reset();
                Ok(CommandOutcome::Reset)
            }
            Command::ToggleAuto => self
                .toggle_auto()
                .map(|enabled| CommandOutcome::AutoToggled { enabled }),
            Command::SetAutoDelay { ms } => {
                self.set_auto_delay(ms);
                Ok(CommandOutcome::AutoDelaySet { ms })
            }
        }
    }

    /// Validates `config` and replaces the simulator with a fresh one.
    ///
    /// # Errors
    ///
    /// [`SessionError::Config`] if the configuration is rejected; the session,
    /// auto-advance included, is left untouched in that case.
    pub fn init(&mut self, config: SimConfig) -> Result<(), SessionError> {
        config.validate()?;
        self.auto.cancel();
        self.auto
            .set_delay(Duration::from_millis(config.auto_delay_ms));
        self.sim = Some(Simulator::new(config));
        Ok(())
    }

    /// Generates and loads `case`, rewinding the cache.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotInitialized`] before `init`.
    pub fn load(&mut self, case: &TestCase) -> Result<&[BlockId], SessionError> {
        self.auto.cancel();
        let sim = self.sim.as_mut().ok_or(SessionError::NotInitialized)?;
        let sequence = sim.load_test_case(case, &mut self.rng);
        info!(?case, len = sequence.len(), "test case loaded");
        Ok(sequence)
    }

    fn loaded_mut(&mut self) -> Result<&mut Simulator, SessionError> {
        let sim = self.sim.as_mut().ok_or(SessionError::NotInitialized)?;
        if sim.phase() == Phase::Uninitialized {
            return Err(SessionError::NoSequence);
        }
        Ok(sim)
    }

    /// Runs one access. Returns `false` at the end of the sequence.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotInitialized`] or [`SessionError::NoSequence`].
    pub fn next(&mut self) -> Result<bool, SessionError> {
        self.auto.cancel();
        Ok(self.loaded_mut()?.step().is_some())
    }

    /// Undoes one access. Returns `false` at the start of the sequence.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotInitialized`] or [`SessionError::NoSequence`].
    pub fn prev(&mut self) -> Result<bool, SessionError> {
        self.auto.cancel();
        Ok(self.loaded_mut()?.step_back())
    }

    /// Runs every remaining access; returns how many ran.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotInitialized`] or [`SessionError::NoSequence`].
    pub fn run_all(&mut self) -> Result<usize, SessionError> {
        self.auto.cancel();
        Ok(self.loaded_mut()?.run_all())
    }

    /// Rewinds the run to an empty cache. No-op before `init`.
    pub fn reset(&mut self) {
        self.auto.cancel();
        if let Some(sim) = self.sim.as_mut() {
            sim.reset();
        }
    }

    /// Switches auto-advance; returns the new state.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotInitialized`] or [`SessionError::NoSequence`].
    pub fn toggle_auto(&mut self) -> Result<bool, SessionError> {
        let sim = self.sim.as_ref().ok_or(SessionError::NotInitialized)?;
        if sim.phase() == Phase::Uninitialized {
            return Err(SessionError::NoSequence);
        }
        Ok(self.auto.toggle(sim))
    }

    /// Sets the auto-advance delay in milliseconds.
    pub fn set_auto_delay(&mut self, ms: u64) {
        self.auto.set_delay(Duration::from_millis(ms));
    }

    /// Timer callback: runs one step if auto-advance is on.
    pub fn tick(&mut self) -> bool {
        match self.sim.as_mut() {
            Some(sim) => self.auto.tick(sim),
            None => {
                self.auto.cancel();
                false
            }
        }
    }

    /// Drives auto-advance to completion, sleeping between ticks with `sleep`.
    pub fn run_auto<F: FnMut(Duration)>(&mut self, sleep: F) -> usize {
        match self.sim.as_mut() {
            Some(sim) => self.auto.run(sim, sleep),
            None => 0,
        }
    }

    /// Current state for rendering.
    pub fn state(&self) -> SessionState {
        SessionState {
            simulation: self.sim.as_ref().map(Simulator::state),
            auto: AutoStatus {
                enabled: self.auto.is_enabled(),
                delay_ms: u64::try_from(self.auto.delay().as_millis()).unwrap_or(u64::MAX),
            },
        }
    }
}
