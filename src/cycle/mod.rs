//! Cycle processing.
//!
//! This module contains the per-cycle aggregator and the loop that
//! drives it over the whole stream.

pub mod aggregator;
pub mod multiplexer;

pub use aggregator::run_cycle;
pub use multiplexer::Multiplexer;
