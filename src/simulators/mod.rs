//! Quantum circuit simulators
//!
//! This module provides the statevector evaluator and the measurement
//! tallies it produces.

pub mod counts;
pub mod statevector;

pub use counts::Counts;
pub use statevector::Evaluator;
