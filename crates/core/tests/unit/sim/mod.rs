//! Simulation layer tests.



/// Auto-advance driver.
pub mod auto;
