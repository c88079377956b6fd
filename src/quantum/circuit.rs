//! Quantum circuits
//!
//! A circuit is an append-only list of operations over a fixed qubit
//! register and a classical register that receives measurement results.

use std::fmt;

use crate::error::{KetError, Result};
use crate::quantum::gate::{ParametrizedGate, QuantumGate, StandardGate};

/// One step of a circuit
#[derive(Debug, Clone)]
pub enum Operation {
    /// A unitary gate on the listed qubits
    Gate {
        gate: Box<dyn QuantumGate>,
        qubits: Vec<usize>,
    },
    /// Computational-basis measurement of `qubit` into `clbit`
    Measure { qubit: usize, clbit: usize },
    /// Reset of `qubit` to |0⟩
    Reset { qubit: usize },
    /// Visual separator with no effect on the state
    Barrier,
}

impl Operation {
    /// Whether the step is a unitary map on the register
    pub fn is_unitary(&self) -> bool {
        matches!(self, Operation::Gate { .. } | Operation::Barrier)
    }

    /// Qubits the step touches
    pub fn qubits(&self) -> &[usize] {
        match self {
            Operation::Gate { qubits, .. } => qubits.as_slice(),
            Operation::Measure { qubit, .. } | Operation::Reset { qubit } => {
                std::slice::from_ref(qubit)
            }
            Operation::Barrier => &[],
        }
    }

    /// Short label used in listings and error messages
    pub fn label(&self) -> String {
        match self {
            Operation::Gate { gate, .. } => gate.name(),
            Operation::Measure { .. } => "measure".to_string(),
            Operation::Reset { .. } => "reset".to_string(),
            Operation::Barrier => "barrier".to_string(),
        }
    }
}

/// A quantum circuit consisting of a sequence of operations
#[derive(Debug, Clone)]
pub struct QuantumCircuit {
    operations: Vec<Operation>,
    qubit_count: usize,
    clbit_count: usize,
}

impl QuantumCircuit {
    /// Create an empty circuit with one classical bit per qubit
    pub fn new(qubit_count: usize) -> Self {
        Self::with_classical(qubit_count, qubit_count)
    }

    /// Create an empty circuit with an explicit classical register size
    pub fn with_classical(qubit_count: usize, clbit_count: usize) -> Self {
        QuantumCircuit {
            operations: Vec::new(),
            qubit_count,
            clbit_count,
        }
    }

    pub fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    pub fn clbit_count(&self) -> usize {
        self.clbit_count
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    fn check_qubit(&self, qubit: usize) -> Result<()> {
        if qubit >= self.qubit_count {
            return Err(KetError::qubit_out_of_range(qubit, self.qubit_count));
        }
        Ok(())
    }

    /// Append a gate acting on `qubits`
    pub fn add_gate(&mut self, gate: Box<dyn QuantumGate>, qubits: &[usize]) -> Result<()> {
        for (pos, &q) in qubits.iter().enumerate() {
            self.check_qubit(q)?;
            if qubits[..pos].contains(&q) {
                return Err(KetError::DimensionMismatch(format!(
                    "gate {} lists qubit {} twice",
                    gate.name(),
                    q
                )));
            }
        }

        if gate.qubit_count() != qubits.len() {
            return Err(KetError::DimensionMismatch(format!(
                "gate {} acts on {} qubits, but {} qubits were specified",
                gate.name(),
                gate.qubit_count(),
                qubits.len()
            )));
        }

        self.operations.push(Operation::Gate {
            gate,
            qubits: qubits.to_vec(),
        });
        Ok(())
    }

    /// Append a measurement of `qubit` into classical bit `clbit`
    pub fn measure(&mut self, qubit: usize, clbit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        if clbit >= self.clbit_count {
            return Err(KetError::DimensionMismatch(format!(
                "classical bit {} out of range for {}-bit register",
                clbit, self.clbit_count
            )));
        }
        self.operations.push(Operation::Measure { qubit, clbit });
        Ok(())
    }

    /// Measure qubit i into classical bit i for every qubit
    pub fn measure_all(&mut self) -> Result<()> {
        if self.clbit_count < self.qubit_count {
            return Err(KetError::DimensionMismatch(format!(
                "measure_all needs {} classical bits, register has {}",
                self.qubit_count, self.clbit_count
            )));
        }
        self.operations.push(Operation::Barrier);
        for q in 0..self.qubit_count {
            self.operations.push(Operation::Measure { qubit: q, clbit: q });
        }
        Ok(())
    }

    pub fn reset(&mut self, qubit: usize) -> Result<()> {
        self.check_qubit(qubit)?;
        self.operations.push(Operation::Reset { qubit });
        Ok(())
    }

    pub fn barrier(&mut self) {
        self.operations.push(Operation::Barrier);
    }

    /// Get the number of gates in the circuit
    pub fn gate_count(&self) -> usize {
        self.operations
            .iter()
            .filter(|op| matches!(op, Operation::Gate { .. }))
            .count()
    }

    /// Whether every step is unitary (no measurement or reset)
    pub fn is_unitary(&self) -> bool {
        self.operations.iter().all(Operation::is_unitary)
    }

    /// Number of layers when operations on disjoint qubits run side by side
    pub fn depth(&self) -> usize {
        let mut layers = vec![0usize; self.qubit_count];
        for op in &self.operations {
            match op {
                Operation::Barrier => {
                    let top = layers.iter().copied().max().unwrap_or(0);
                    layers.iter_mut().for_each(|l| *l = top);
                }
                _ => {
                    let qubits = op.qubits();
                    let next = qubits.iter().map(|&q| layers[q]).max().unwrap_or(0) + 1;
                    for &q in qubits {
                        layers[q] = next;
                    }
                }
            }
        }
        layers.into_iter().max().unwrap_or(0)
    }

    /// Append all of `other`'s operations after this circuit's
    pub fn compose(&self, other: &QuantumCircuit) -> Result<QuantumCircuit> {
        if self.qubit_count != other.qubit_count {
            return Err(KetError::DimensionMismatch(format!(
                "cannot compose circuits with {} and {} qubits",
                self.qubit_count, other.qubit_count
            )));
        }

        let mut result = QuantumCircuit {
            operations: self.operations.clone(),
            qubit_count: self.qubit_count,
            clbit_count: self.clbit_count.max(other.clbit_count),
        };
        result.operations.extend(other.operations.iter().cloned());
        Ok(result)
    }

    /// Place `other` on fresh qubits below this circuit's register
    pub fn tensor(&self, other: &QuantumCircuit) -> QuantumCircuit {
        let q_offset = self.qubit_count;
        let c_offset = self.clbit_count;
        let mut result = QuantumCircuit {
            operations: self.operations.clone(),
            qubit_count: self.qubit_count + other.qubit_count,
            clbit_count: self.clbit_count + other.clbit_count,
        };

        result
            .operations
            .extend(other.operations.iter().map(|op| match op {
                Operation::Gate { gate, qubits } => Operation::Gate {
                    gate: gate.clone(),
                    qubits: qubits.iter().map(|&q| q + q_offset).collect(),
                },
                Operation::Measure { qubit, clbit } => Operation::Measure {
                    qubit: qubit + q_offset,
                    clbit: clbit + c_offset,
                },
                Operation::Reset { qubit } => Operation::Reset {
                    qubit: qubit + q_offset,
                },
                Operation::Barrier => Operation::Barrier,
            }));
        result
    }

    /// The inverse circuit: gates reversed and replaced by their adjoints
    pub fn adjoint(&self) -> Result<QuantumCircuit> {
        let mut result = QuantumCircuit::with_classical(self.qubit_count, self.clbit_count);

        for op in self.operations.iter().rev() {
            match op {
                Operation::Gate { gate, qubits } => result.operations.push(Operation::Gate {
                    gate: gate.adjoint(),
                    qubits: qubits.clone(),
                }),
                Operation::Barrier => result.operations.push(Operation::Barrier),
                other => {
                    return Err(KetError::UnsupportedOperation(format!(
                        "{} has no inverse",
                        other.label()
                    )))
                }
            }
        }

        Ok(result)
    }
}

impl fmt::Display for QuantumCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::visualization::render_circuit(self))
    }
}

/// Fluent builder for quantum circuits
pub struct CircuitBuilder {
    circuit: QuantumCircuit,
}

impl CircuitBuilder {
    /// Create a new circuit builder
    pub fn new(qubit_count: usize) -> Self {
        CircuitBuilder {
            circuit: QuantumCircuit::new(qubit_count),
        }
    }

    pub fn with_classical(qubit_count: usize, clbit_count: usize) -> Self {
        CircuitBuilder {
            circuit: QuantumCircuit::with_classical(qubit_count, clbit_count),
        }
    }

    /// Build the quantum circuit
    pub fn build(self) -> QuantumCircuit {
        self.circuit
    }

    pub fn add_gate<G: QuantumGate + 'static>(
        &mut self,
        gate: G,
        qubits: &[usize],
    ) -> Result<&mut Self> {
        self.circuit.add_gate(Box::new(gate), qubits)?;
        Ok(self)
    }

    /// Add a Hadamard gate
    pub fn h(&mut self, qubit: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::H, &[qubit])
    }

    pub fn x(&mut self, qubit: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::X, &[qubit])
    }

    pub fn y(&mut self, qubit: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::Y, &[qubit])
    }

    pub fn z(&mut self, qubit: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::Z, &[qubit])
    }

    pub fn s(&mut self, qubit: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::S, &[qubit])
    }

    pub fn t(&mut self, qubit: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::T, &[qubit])
    }

    /// Add a √X gate
    pub fn sx(&mut self, qubit: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::SX, &[qubit])
    }

    /// Add a CNOT gate
    pub fn cnot(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::CNOT, &[control, target])
    }

    pub fn cz(&mut self, control: usize, target: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::CZ, &[control, target])
    }

    pub fn swap(&mut self, qubit1: usize, qubit2: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::SWAP, &[qubit1, qubit2])
    }

    /// Add a Toffoli gate (CCNOT)
    pub fn toffoli(&mut self, control1: usize, control2: usize, target: usize) -> Result<&mut Self> {
        self.add_gate(StandardGate::Toffoli, &[control1, control2, target])
    }

    pub fn rx(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.add_gate(ParametrizedGate::Rx(theta), &[qubit])
    }

    pub fn ry(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.add_gate(ParametrizedGate::Ry(theta), &[qubit])
    }

    pub fn rz(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.add_gate(ParametrizedGate::Rz(theta), &[qubit])
    }

    pub fn phase(&mut self, qubit: usize, theta: f64) -> Result<&mut Self> {
        self.add_gate(ParametrizedGate::Phase(theta), &[qubit])
    }

    pub fn u3(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) -> Result<&mut Self> {
        self.add_gate(ParametrizedGate::U3(theta, phi, lambda), &[qubit])
    }

    /// Add a controlled Rz gate
    pub fn crz(&mut self, control: usize, target: usize, theta: f64) -> Result<&mut Self> {
        self.add_gate(ParametrizedGate::CRz(theta), &[control, target])
    }

    /// Prepare (|00⟩ + |11⟩)/√2 on the two qubits
    pub fn bell_pair(&mut self, qubit1: usize, qubit2: usize) -> Result<&mut Self> {
        self.h(qubit1)?;
        self.cnot(qubit1, qubit2)
    }

    pub fn measure(&mut self, qubit: usize, clbit: usize) -> Result<&mut Self> {
        self.circuit.measure(qubit, clbit)?;
        Ok(self)
    }

    pub fn measure_all(&mut self) -> Result<&mut Self> {
        self.circuit.measure_all()?;
        Ok(self)
    }

    pub fn reset(&mut self, qubit: usize) -> Result<&mut Self> {
        self.circuit.reset(qubit)?;
        Ok(self)
    }

    pub fn barrier(&mut self) -> &mut Self {
        self.circuit.barrier();
        self
    }
}
