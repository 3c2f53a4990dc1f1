//! Step-by-step set-associative cache simulator library.
//!
//! This crate models the block-level behavior of a single cache for teaching and visualization:
//! 1. **Cache:** Set/way grid of block ids with direct, set-associative, and fully-associative mapping.
//! 2. **Policies:** LRU, MRU, and FIFO replacement, each tracking a per-set order list.
//! 3. **Simulation:** Reversible stepping over an access sequence with per-step snapshots and a transcript.
//! 4. **Statistics:** Hit/miss counts, rates, and modeled access times derived from the transcript.
//! 5. **Session:** Command-driven front door (`init`, `load`, `next`, `prev`, ...) with auto-advance.

/// Common types (block ids, errors).
pub mod common;
/// Simulator configuration (defaults, enums, cache and timing parameters).
pub mod config;
/// Cache store, replacement policies, and the single-access engine.
pub mod cache;
/// Stepping simulator, history records, test-sequence generators, auto-advance.
pub mod sim;
/// Command boundary consumed by user interfaces.
pub mod session;
/// Access statistics derived from the simulation log.
pub mod stats;

/// Root configuration type; use `SimConfig::default()` or deserialize from JSON.
pub use crate::config::SimConfig;
/// Command-driven simulation session.
pub use crate::session::Session;
/// Stepping simulator; owns the cache engine and its history.
pub use crate::sim::Simulator;
