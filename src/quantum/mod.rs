//! Quantum states, gates and circuits
//!
//! These are the values the evaluator consumes: a circuit is built from
//! gates, and a state vector is what it acts on.

pub mod circuit;
pub mod gate;
pub mod linalg;
pub mod state;

pub use circuit::{CircuitBuilder, Operation, QuantumCircuit};
pub use gate::{CustomMatrixGate, ParametrizedGate, QuantumGate, StandardGate};
pub use state::{BellState, QuantumState, Qubit, StateVector};

/// Re-export commonly used types and traits
pub mod prelude {
    pub use super::{BellState, QuantumState, Qubit, StateVector};
    pub use super::{CircuitBuilder, QuantumCircuit};
    pub use super::{CustomMatrixGate, ParametrizedGate, QuantumGate, StandardGate};
}
