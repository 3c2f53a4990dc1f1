//! Simulator: owns the cache engine, the access sequence, and the step history.
//!
//! Every forward step pushes one immutable [`StepRecord`] (with deep copies of
//! the grid and the policy order) and one [`LogEntry`]. The cursor is simply
//! the number of records, so a backward step is a true undo: pop the last
//! record, truncate the log, and restore the engine from the record before it,
//! or reset the engine when no records remain.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::generator::TestCase;
use super::history::{LogEntry, StepRecord};
use crate::cache::{CacheEngine, CacheGrid};
use crate::common::BlockId;
use crate::common::block::in_domain;
use crate::config::{MappingMode, ReplacementPolicy, SimConfig};
use crate::stats::AccessStats;

/// Lifecycle of a simulation run, derived from the sequence and the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No sequence has been loaded.
    Uninitialized,
    /// A sequence is loaded and no step has run.
    Configured,
    /// Some, but not all, steps have run.
    Stepping,
    /// Every access of the sequence has run.
    Complete,
}

/// Full state for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimState {
    /// Cache grid, `[set][way]`.
    pub cache_grid: CacheGrid,
    /// Replacement order of each set, head first.
    pub replacement_order: Vec<Vec<BlockId>>,
    /// 0-based index of the last executed access, `None` before the first.
    pub current_step: Option<usize>,
    /// Loaded sequence (empty if none).
    pub sequence: Vec<BlockId>,
    /// Transcript so far.
    pub log: Vec<LogEntry>,
    /// Statistics over the transcript.
    pub stats: AccessStats,
    /// Mapping mode in use.
    pub mapping: MappingMode,
    /// Replacement policy in use.
    pub policy: ReplacementPolicy,
    /// Lifecycle phase.
    pub phase: Phase,
}

/// Top-level stepping simulator.
#[derive(Debug)]
pub struct Simulator {
    config: SimConfig,
    engine: CacheEngine,
    sequence: Option<Vec<BlockId>>,
    history: Vec<StepRecord>,
    log: Vec<LogEntry>,
}

impl Simulator {
    /// Creates a simulator with an empty cache and no sequence.
    ///
    /// The configuration is assumed valid; see [`SimConfig::validate`].
    pub fn new(config: SimConfig) -> Self {
        let engine = CacheEngine::new(&config.cache);
        info!(
            blocks = config.cache.total_blocks,
            sets = engine.store().num_sets(),
            ways = engine.store().ways(),
            line_size = config.cache.line_size,
            mapping = %config.cache.mapping,
            policy = %config.cache.policy,
            "cache initialized"
        );
        Self {
            config,
            engine,
            sequence: None,
            history: Vec::new(),
            log: Vec::new(),
        }
    }

    /// Configuration the simulator was built with.
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// The cache engine.
    pub const fn engine(&self) -> &CacheEngine {
        &self.engine
    }

    /// Replaces the access sequence and rewinds to an empty cache.
    ///
    /// Ids outside `[0, memory_blocks)` are dropped.
    pub fn load(&mut self, sequence: Vec<BlockId>) {
        let memory_blocks = self.config.memory_blocks;
        let before = sequence.len();
        let sequence: Vec<BlockId> = sequence
            .into_iter()
            .filter(|&id| in_domain(id, memory_blocks))
            .collect();
        if sequence.len() != before {
            warn!(
                dropped = before - sequence.len(),
                memory_blocks, "out-of-range block ids dropped from sequence"
            );
        }
        info!(len = sequence.len(), "sequence loaded");
        self.sequence = Some(sequence);
        self.rewind();
    }

    /// Generates `case` and loads it; returns the loaded sequence.
    pub fn load_test_case<R: rand::Rng>(&mut self, case: &TestCase, rng: &mut R) -> &[BlockId] {
        let sequence = case.generate(self.config.memory_blocks, self.config.random_count, rng);
        self.load(sequence);
        self.sequence()
    }

    /// Loaded sequence, or an empty slice.
    pub fn sequence(&self) -> &[BlockId] {
        self.sequence.as_deref().unwrap_or_default()
    }

    /// Number of completed steps.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.history.len()
    }

    /// 0-based index of the last executed access.
    pub fn current_step(&self) -> Option<usize> {
        self.history.len().checked_sub(1)
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        match &self.sequence {
            None => Phase::Uninitialized,
            Some(seq) if self.cursor() >= seq.len() => Phase::Complete,
            Some(_) if self.cursor() == 0 => Phase::Configured,
            Some(_) => Phase::Stepping,
        }
    }

    /// Returns true once every access has run (or no sequence is loaded).
    pub fn is_complete(&self) -> bool {
        self.cursor() >= self.sequence().len()
    }

    /// Step records so far, oldest first.
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    /// Transcript so far, oldest first.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Runs the next access of the sequence.
    ///
    /// Returns the new record, or `None` if there is no further access.
    pub fn step(&mut self) -> Option<&StepRecord> {
        let block = *self.sequence.as_ref()?.get(self.cursor())?;
        let step = self.cursor() + 1;
        let access = self.engine.access(block);

        let record = StepRecord {
            step,
            block,
            set: access.set,
            outcome: access.outcome,
            evicted: access.evicted,
            snapshot: self.engine.snapshot(),
        };
        debug!(step, block, outcome = ?access.outcome, "step");
        self.log.push(LogEntry::from_access(step, access));
        self.history.push(record);
        self.history.last()
    }

    /// Undoes the last step.
    ///
    /// Returns `false` if no step has run.
    pub fn step_back(&mut self) -> bool {
        let Some(undone) = self.history.pop() else {
            return false;
        };
        self.log.truncate(self.history.len());
        match self.history.last() {
            Some(previous) => {
                let _ = self.engine.restore(&previous.snapshot);
            }
            None => self.engine.reset(),
        }
        debug!(step = undone.step, "stepped back");
        true
    }

    /// Runs every remaining access; returns how many ran.
    pub fn run_all(&mut self) -> usize {
        let mut steps = 0;
        while self.step().is_some() {
            steps += 1;
        }
        info!(steps, "run complete");
        steps
    }

    /// Rewinds to an empty cache, keeping the sequence.
    pub fn reset(&mut self) {
        info!("simulation reset");
        self.rewind();
    }

    fn rewind(&mut self) {
        self.engine.reset();
        self.history.clear();
        self.log.clear();
    }

    /// Statistics over the completed accesses.
    pub fn stats(&self) -> AccessStats {
        AccessStats::compute(
            &self.log,
            self.sequence.as_ref().map(Vec::len),
            self.engine.config().line_size,
            &self.config.timing,
        )
    }

    /// Builds the full state for rendering.
    pub fn state(&self) -> SimState {
        let snapshot = self.engine.snapshot();
        SimState {
            cache_grid: snapshot.cache,
            replacement_order: snapshot.order,
            current_step: self.current_step(),
            sequence: self.sequence().to_vec(),
            log: self.log.clone(),
            stats: self.stats(),
            mapping: self.engine.config().mapping,
            policy: self.engine.config().policy,
            phase: self.phase(),
        }
    }
}
