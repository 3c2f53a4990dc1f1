//! Stepping simulation over an access sequence.
//!
//! Provides the reversible simulator, its step records and transcript, the
//! test-sequence generators, and the auto-advance driver.

/// Timer-driven auto-advance.
pub mod auto;

/// Test-sequence generators.
pub mod generator;

/// Step records and transcript entries.
pub mod history;

/// Reversible stepping simulator.
pub mod simulator;

pub use auto::AutoAdvance;
pub use generator::{CustomId, CustomInput, TestCase};
pub use history::{LogEntry, StepRecord};
pub use simulator::{Phase, SimState, Simulator};
