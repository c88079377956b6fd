//! Error types for circuit evaluation

use thiserror::Error;

/// Errors raised while building or evaluating circuits
#[derive(Error, Debug, Clone, PartialEq)]
pub enum KetError {
    /// A gate matrix is not unitary (or not a valid gate shape)
    #[error("Invalid gate '{name}': {reason}")]
    InvalidGate { name: String, reason: String },

    /// A qubit index, matrix shape or vector length does not fit the register
    #[error("Dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A supplied state does not have unit norm
    #[error("State vector not normalized, norm = {norm}")]
    NotNormalized { norm: f64 },

    /// A non-unitary step was found where only unitary steps are allowed
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Sampling was requested with zero shots
    #[error("Shot count must be positive, got {0}")]
    InvalidShots(usize),

    /// A backend was asked for a job it never issued
    #[error("Unknown job id {0}")]
    UnknownJob(u64),
}

impl KetError {
    /// Shorthand for an out-of-range qubit index
    pub(crate) fn qubit_out_of_range(qubit: usize, qubit_count: usize) -> Self {
        KetError::DimensionMismatch(format!(
            "qubit index {} out of range for {}-qubit register",
            qubit, qubit_count
        ))
    }
}

/// Result type for circuit evaluation
pub type Result<T> = std::result::Result<T, KetError>;
