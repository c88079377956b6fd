//! Statevector evaluation of small quantum circuits
//!
//! Build a [`QuantumCircuit`](quantum::QuantumCircuit) from standard,
//! parametrized or custom gates, then hand it to an
//! [`Evaluator`](simulators::Evaluator) to get the final state, the
//! circuit's unitary, or sampled measurement counts.
//!
//! Basis indices follow [`QubitOrdering::BigEndian`](config::QubitOrdering)
//! unless the evaluator is configured otherwise.

pub mod backend;
pub mod config;
pub mod error;
pub mod quantum;
pub mod simulators;
pub mod visualization;

pub use error::{KetError, Result};

pub mod prelude {
    pub use crate::backend::{least_busy, Backend, JobId, StatevectorBackend};
    pub use crate::config::{EvaluatorConfig, QubitOrdering, DEFAULT_QUBIT_ORDERING};
    pub use crate::error::{KetError, Result};
    pub use crate::quantum::prelude::*;
    pub use crate::simulators::{Counts, Evaluator};
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
