//! Access statistics.
//!
//! Statistics are recomputed from the transcript on every query rather than
//! counted incrementally, so truncating the log on a backward step corrects
//! them automatically. It provides:
//! 1. **Counts:** Completed accesses, hits, misses, and progress through the sequence.
//! 2. **Rates:** Hit and miss percentages (0 before the first access).
//! 3. **Timing:** Average and total modeled access time from the latency model.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::cache::Outcome;
use crate::config::TimingConfig;
use crate::sim::LogEntry;

/// Aggregate statistics over the completed accesses.
///
/// The rates and times keep full precision in memory and serialize rounded to
/// two decimals, the precision the report shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessStats {
    /// Completed accesses.
    pub total_accesses: usize,
    /// Accesses that hit.
    pub hits: usize,
    /// Accesses that missed.
    pub misses: usize,
    /// Hits as a percentage of completed accesses.
    #[serde(serialize_with = "two_decimals")]
    pub hit_rate: f64,
    /// Misses as a percentage of completed accesses.
    #[serde(serialize_with = "two_decimals")]
    pub miss_rate: f64,
    /// Average modeled time per access.
    #[serde(serialize_with = "two_decimals")]
    pub avg_access_time: f64,
    /// Sum of modeled per-access costs.
    #[serde(serialize_with = "two_decimals")]
    pub total_access_time: f64,
    /// `"done / length"`, or `"0 / 0"` with no sequence.
    pub progress: String,
}

impl AccessStats {
    /// Computes statistics from a transcript.
    ///
    /// # Arguments
    ///
    /// * `log` - Transcript of completed accesses.
    /// * `sequence_len` - Length of the loaded sequence, if any.
    /// * `line_size` - Words per line; scales the miss penalty.
    /// * `timing` - Cache and memory latencies.
    ///
    /// With `c` the cache latency, `m` the memory latency and `L` the line
    /// size, a hit costs `c` on average and a miss costs `c + L·m + c`. The
    /// total charges a hit `L·c` and a miss `c + L·c + L·m`.
    pub fn compute(
        log: &[LogEntry],
        sequence_len: Option<usize>,
        line_size: usize,
        timing: &TimingConfig,
    ) -> Self {
        let total_accesses = log.len();
        let hits = log.iter().filter(|e| e.outcome == Outcome::Hit).count();
        let misses = log.iter().filter(|e| e.outcome == Outcome::Miss).count();

        let c = timing.cache_latency as f64;
        let m = timing.memory_latency as f64;
        let line = line_size as f64;

        let total_access_time =
            hits as f64 * line * c + misses as f64 * line.mul_add(m, line.mul_add(c, c));

        let (hit_rate, miss_rate, avg_access_time) = if total_accesses == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let total = total_accesses as f64;
            let hit_fraction = hits as f64 / total;
            let miss_fraction = misses as f64 / total;
            let miss_cost = line.mul_add(m, c) + c;
            (
                hit_fraction * 100.0,
                miss_fraction * 100.0,
                hit_fraction.mul_add(c, miss_fraction * miss_cost),
            )
        };

        let progress = match sequence_len {
            Some(len) if len > 0 => format!("{total_accesses} / {len}"),
            _ => "0 / 0".to_string(),
        };

        Self {
            total_accesses,
            hits,
            misses,
            hit_rate,
            miss_rate,
            avg_access_time,
            total_access_time,
            progress,
        }
    }
}

impl fmt::Display for AccessStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ACCESS STATISTICS")?;
        writeln!(f, "----------------------------------------")?;
        writeln!(f, "  Progress:            {}", self.progress)?;
        writeln!(f, "  Hits:                {}", self.hits)?;
        writeln!(f, "  Misses:              {}", self.misses)?;
        writeln!(f, "  Hit rate:            {:.2}%", self.hit_rate)?;
        writeln!(f, "  Miss rate:           {:.2}%", self.miss_rate)?;
        writeln!(f, "  Avg access time:     {:.2} ns", self.avg_access_time)?;
        write!(f, "  Total access time:   {:.2} ns", self.total_access_time)
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn two_decimals<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 100.0).round() / 100.0)
}
