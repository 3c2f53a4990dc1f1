//! Step records and transcript entries.
//!
//! One [`StepRecord`] and one [`LogEntry`] are appended per access. Records are
//! never edited; stepping backward truncates both lists to the new cursor.

use serde::Serialize;

use crate::cache::{AccessResult, EngineSnapshot, Outcome};
use crate::common::{BlockId, SetIndex};

/// Immutable snapshot of the simulation after one access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    /// 1-based step number.
    pub step: usize,
    /// Block accessed.
    pub block: BlockId,
    /// Set it mapped to.
    pub set: SetIndex,
    /// Hit or miss.
    pub outcome: Outcome,
    /// Block evicted, if any.
    pub evicted: Option<BlockId>,
    /// Cache grid and policy order after the access.
    pub snapshot: EngineSnapshot,
}

/// Transcript line for one access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    /// 1-based step number.
    pub step: usize,
    /// Block accessed.
    pub block: BlockId,
    /// Set it mapped to.
    pub set: SetIndex,
    /// Hit or miss.
    pub outcome: Outcome,
    /// Block evicted, if any.
    pub evicted: Option<BlockId>,
    /// Policy's account of the decision.
    pub explanation: String,
}

impl LogEntry {
    pub(crate) fn from_access(step: usize, access: AccessResult) -> Self {
        Self {
            step,
            block: access.block,
            set: access.set,
            outcome: access.outcome,
            evicted: access.evicted,
            explanation: access.explanation,
        }
    }
}
