//! Evaluator configuration
//!
//! The qubit ordering convention lives here and nowhere else. Every
//! operator expansion, sampling routine and label renderer reads it from
//! the [`EvaluatorConfig`] it was handed.

use serde::{Deserialize, Serialize};

/// Which end of the basis index qubit 0 occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QubitOrdering {
    /// Qubit 0 is the most significant bit: |q0 q1 ... q(n-1)⟩
    BigEndian,
    /// Qubit 0 is the least significant bit: |q(n-1) ... q1 q0⟩
    LittleEndian,
}

/// Ordering used when nothing else is configured
pub const DEFAULT_QUBIT_ORDERING: QubitOrdering = QubitOrdering::BigEndian;

/// Tolerance for unitarity and normalization checks
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Register size at which matrix-vector products switch to rayon.
/// 2^10 amplitudes, i.e. 10 qubits.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 10;

impl QubitOrdering {
    /// Bit position of `qubit` inside a basis index of a `qubit_count` register
    pub fn shift(self, qubit: usize, qubit_count: usize) -> usize {
        match self {
            QubitOrdering::BigEndian => qubit_count - 1 - qubit,
            QubitOrdering::LittleEndian => qubit,
        }
    }

    /// Value (0 or 1) of `qubit` in basis index `index`
    pub fn bit(self, index: usize, qubit: usize, qubit_count: usize) -> usize {
        (index >> self.shift(qubit, qubit_count)) & 1
    }
}

impl Default for QubitOrdering {
    fn default() -> Self {
        DEFAULT_QUBIT_ORDERING
    }
}

/// Configuration held by an [`Evaluator`](crate::simulators::Evaluator)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    pub ordering: QubitOrdering,
    pub tolerance: f64,
    pub parallel_threshold: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            ordering: DEFAULT_QUBIT_ORDERING,
            tolerance: DEFAULT_TOLERANCE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl EvaluatorConfig {
    pub fn with_ordering(mut self, ordering: QubitOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_conventions() {
        assert_eq!(QubitOrdering::BigEndian.shift(0, 3), 2);
        assert_eq!(QubitOrdering::LittleEndian.shift(0, 3), 0);
        // index 0b100: qubit 0 set under big-endian, qubit 2 under little-endian
        assert_eq!(QubitOrdering::BigEndian.bit(0b100, 0, 3), 1);
        assert_eq!(QubitOrdering::LittleEndian.bit(0b100, 2, 3), 1);
        assert_eq!(QubitOrdering::LittleEndian.bit(0b100, 0, 3), 0);
    }

    #[test]
    fn test_partial_config_deserializes_with_defaults() {
        let config: EvaluatorConfig =
            serde_json::from_str(r#"{"ordering":"LittleEndian"}"#).unwrap();
        assert_eq!(config.ordering, QubitOrdering::LittleEndian);
        assert_eq!(config.tolerance, DEFAULT_TOLERANCE);
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
    }
}
