//! # Unit Components
//!
//! Tests for the individual pieces of the simulator, from configuration
//! validation up to the command-driven session.

/// Configuration defaults, validation, and JSON parsing.
pub mod config;


/// Stepping simulator, generators, and auto-advance.
pub mod sim;


/// Command boundary and error reporting.
pub mod session;
