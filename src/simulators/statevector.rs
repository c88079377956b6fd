//! Statevector evaluator
//!
//! Every operation here is a pure function of its inputs and the
//! [`EvaluatorConfig`] the evaluator was built with. Gates are lifted to
//! full-register operators and multiplied into the state one at a time; the
//! state is renormalized after each step so floating-point drift never
//! accumulates.

use log::{debug, trace};
use ndarray::Array2;
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::EvaluatorConfig;
use crate::error::{KetError, Result};
use crate::quantum::circuit::{Operation, QuantumCircuit};
use crate::quantum::gate::QuantumGate;
use crate::quantum::linalg;
use crate::quantum::state::{QuantumState, StateVector};
use crate::simulators::counts::Counts;

/// Evaluates circuits against statevectors
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator {
    config: EvaluatorConfig,
}

/// Where sampled measurement results land
enum Readout {
    /// No measurements: read every qubit, label over the qubit register
    AllQubits,
    /// `(qubit, clbit)` pairs, label over the classical register
    Classical(Vec<(usize, usize)>),
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Evaluator { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Full-register operator for `matrix` acting on `qubits` of a `qubit_count` register
    pub fn expand_operator(
        &self,
        matrix: &Array2<Complex64>,
        qubits: &[usize],
        qubit_count: usize,
    ) -> Result<Array2<Complex64>> {
        linalg::expand_operator(matrix, qubits, qubit_count, self.config.ordering)
    }

    fn gate_operator(
        &self,
        gate: &dyn QuantumGate,
        qubits: &[usize],
        qubit_count: usize,
    ) -> Result<Array2<Complex64>> {
        let matrix = gate.matrix();
        if !linalg::is_unitary(&matrix, self.config.tolerance) {
            return Err(KetError::InvalidGate {
                name: gate.name(),
                reason: format!("matrix is not unitary within {:e}", self.config.tolerance),
            });
        }
        self.expand_operator(&matrix, qubits, qubit_count)
    }

    fn check_initial_state(&self, circuit: &QuantumCircuit, state: &StateVector) -> Result<()> {
        if state.qubit_count() != circuit.qubit_count() {
            return Err(KetError::DimensionMismatch(format!(
                "state has {} amplitudes, circuit over {} qubits needs {}",
                state.dimension(),
                circuit.qubit_count(),
                1usize << circuit.qubit_count()
            )));
        }
        if !state.is_normalized(self.config.tolerance) {
            return Err(KetError::NotNormalized {
                norm: state.norm_sqr().sqrt(),
            });
        }
        Ok(())
    }

    /// Run the gates of `circuit` on `initial`, skipping barriers.
    ///
    /// Measurements are skipped when `skip_measurements` is set; otherwise
    /// they are rejected, as are resets.
    fn evolve(
        &self,
        circuit: &QuantumCircuit,
        initial: Option<&StateVector>,
        skip_measurements: bool,
    ) -> Result<StateVector> {
        let n = circuit.qubit_count();
        let mut state = match initial {
            Some(state) => {
                self.check_initial_state(circuit, state)?;
                state.clone()
            }
            None => StateVector::zero_state(n),
        };

        debug!(qubits = n, operations = circuit.operations().len(); "Evaluating circuit");

        for (step, op) in circuit.operations().iter().enumerate() {
            match op {
                Operation::Gate { gate, qubits } => {
                    let operator = self.gate_operator(gate.as_ref(), qubits, n)?;
                    let amplitudes =
                        linalg::mat_vec(&operator, state.amplitudes(), self.config.parallel_threshold);
                    state = StateVector::from_raw(n, amplitudes);
                    state.renormalize();
                    trace!(step = step, gate = gate.name().as_str(); "Applied gate");
                }
                Operation::Barrier => {}
                Operation::Measure { .. } if skip_measurements => {}
                other => {
                    return Err(KetError::UnsupportedOperation(format!(
                        "{} at step {} is not unitary",
                        other.label(),
                        step
                    )))
                }
            }
        }

        Ok(state)
    }

    /// Apply `circuit` to `initial_state` (|0…0⟩ when `None`) and return the final state
    pub fn apply(
        &self,
        circuit: &QuantumCircuit,
        initial_state: Option<&StateVector>,
    ) -> Result<StateVector> {
        self.evolve(circuit, initial_state, false)
    }

    /// The single matrix equal to the whole circuit.
    ///
    /// For steps U₁ … Uₖ in application order the result is Uₖ ⋯ U₂ U₁.
    pub fn compose_unitary(&self, circuit: &QuantumCircuit) -> Result<Array2<Complex64>> {
        let n = circuit.qubit_count();
        let mut unitary = linalg::identity(1usize << n);

        for (step, op) in circuit.operations().iter().enumerate() {
            match op {
                Operation::Gate { gate, qubits } => {
                    let operator = self.gate_operator(gate.as_ref(), qubits, n)?;
                    unitary = operator.dot(&unitary);
                }
                Operation::Barrier => {}
                other => {
                    return Err(KetError::UnsupportedOperation(format!(
                        "cannot compose a unitary over {} at step {}",
                        other.label(),
                        step
                    )))
                }
            }
        }

        debug!(qubits = n; "Composed circuit unitary");
        Ok(unitary)
    }

    /// Probability of each basis state after the unitary part of `circuit`
    pub fn probabilities(&self, circuit: &QuantumCircuit) -> Result<Vec<f64>> {
        self.readout(circuit)?;
        Ok(self.evolve(circuit, None, true)?.probabilities())
    }

    /// ⟨ψ|O|ψ⟩ for a Hermitian full-register observable
    pub fn expectation_value(
        &self,
        state: &StateVector,
        observable: &Array2<Complex64>,
    ) -> Result<f64> {
        let dim = state.dimension();
        if observable.dim() != (dim, dim) {
            return Err(KetError::DimensionMismatch(format!(
                "observable is {}x{}, state needs {}x{}",
                observable.nrows(),
                observable.ncols(),
                dim,
                dim
            )));
        }
        if linalg::max_abs_diff(observable, &linalg::adjoint(observable)) > self.config.tolerance {
            return Err(KetError::InvalidGate {
                name: "observable".to_string(),
                reason: "matrix is not Hermitian".to_string(),
            });
        }

        let o_psi = observable.dot(state.amplitudes());
        let expectation: Complex64 = state
            .amplitudes()
            .iter()
            .zip(o_psi.iter())
            .map(|(a, b)| a.conj() * b)
            .sum();
        Ok(expectation.re)
    }

    /// Expectation of a local observable acting on `qubits`
    pub fn expectation_on(
        &self,
        state: &StateVector,
        observable: &Array2<Complex64>,
        qubits: &[usize],
    ) -> Result<f64> {
        let full = self.expand_operator(observable, qubits, state.qubit_count())?;
        self.expectation_value(state, &full)
    }

    /// Validate measurement placement and work out the readout layout
    fn readout(&self, circuit: &QuantumCircuit) -> Result<Readout> {
        let mut measured = vec![false; circuit.qubit_count()];
        let mut pairs = Vec::new();

        for (step, op) in circuit.operations().iter().enumerate() {
            match op {
                Operation::Measure { qubit, clbit } => {
                    measured[*qubit] = true;
                    pairs.retain(|&(_, c)| c != *clbit);
                    pairs.push((*qubit, *clbit));
                }
                Operation::Gate { gate, qubits } => {
                    if let Some(&q) = qubits.iter().find(|&&q| measured[q]) {
                        return Err(KetError::UnsupportedOperation(format!(
                            "{} at step {} acts on qubit {} after it was measured",
                            gate.name(),
                            step,
                            q
                        )));
                    }
                }
                Operation::Reset { .. } => {
                    return Err(KetError::UnsupportedOperation(format!(
                        "reset at step {} cannot be sampled",
                        step
                    )))
                }
                Operation::Barrier => {}
            }
        }

        if pairs.is_empty() {
            Ok(Readout::AllQubits)
        } else {
            Ok(Readout::Classical(pairs))
        }
    }

    fn label(&self, index: usize, circuit: &QuantumCircuit, readout: &Readout) -> String {
        let n = circuit.qubit_count();
        match readout {
            // `{:b}` never prints zero digits
            Readout::AllQubits if n == 0 => String::new(),
            Readout::AllQubits => format!("{:0width$b}", index, width = n),
            Readout::Classical(pairs) => {
                let m = circuit.clbit_count();
                let ordering = self.config.ordering;
                let value = pairs.iter().fold(0usize, |acc, &(qubit, clbit)| {
                    acc | (ordering.bit(index, qubit, n) << ordering.shift(clbit, m))
                });
                format!("{:0width$b}", value, width = m)
            }
        }
    }

    /// Draw `shots` outcomes from the final state of `circuit`.
    ///
    /// Measurements must be terminal. With no measurements every qubit is
    /// read; otherwise labels are rendered over the classical register.
    pub fn sample<R: Rng + ?Sized>(
        &self,
        circuit: &QuantumCircuit,
        shots: usize,
        rng: &mut R,
    ) -> Result<Counts> {
        if shots == 0 {
            return Err(KetError::InvalidShots(shots));
        }

        let readout = self.readout(circuit)?;
        let state = self.evolve(circuit, None, true)?;

        let mut cumulative = Vec::with_capacity(state.dimension());
        let mut total = 0.0;
        for p in state.probabilities() {
            total += p;
            cumulative.push(total);
        }

        let last = cumulative.len() - 1;
        let mut counts = Counts::new();
        for _ in 0..shots {
            let r = rng.gen::<f64>() * total;
            let index = cumulative.partition_point(|&c| c <= r).min(last);
            counts.record(self.label(index, circuit, &readout));
        }

        debug!(shots = shots, outcomes = counts.len(); "Sampled circuit");
        Ok(counts)
    }

    /// [`sample`](Self::sample) with a `StdRng` seeded from `seed`, or from entropy when `None`
    pub fn sample_with_seed(
        &self,
        circuit: &QuantumCircuit,
        shots: usize,
        seed: Option<u64>,
    ) -> Result<Counts> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        self.sample(circuit, shots, &mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QubitOrdering;
    use crate::quantum::circuit::CircuitBuilder;

    #[test]
    fn test_label_follows_classical_ordering() {
        // X on qubit 0, measured into clbit 1 of a 2-bit register
        let mut builder = CircuitBuilder::new(2);
        builder.x(0).unwrap().measure(0, 1).unwrap();
        let circuit = builder.build();

        let big = Evaluator::default().sample_with_seed(&circuit, 5, Some(1)).unwrap();
        assert_eq!(big.get("01"), 5);

        let little = Evaluator::new(
            EvaluatorConfig::default().with_ordering(QubitOrdering::LittleEndian),
        )
        .sample_with_seed(&circuit, 5, Some(1))
        .unwrap();
        assert_eq!(little.get("10"), 5);
    }

    #[test]
    fn test_zero_shots_rejected() {
        let circuit = QuantumCircuit::new(1);
        assert_eq!(
            Evaluator::default().sample_with_seed(&circuit, 0, Some(3)),
            Err(KetError::InvalidShots(0))
        );
    }

    #[test]
    fn test_empty_register_samples_empty_label() {
        let circuit = QuantumCircuit::new(0);
        let counts = Evaluator::default().sample_with_seed(&circuit, 3, Some(5)).unwrap();
        assert_eq!(counts.get(""), 3);
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_apply_rejects_measurement() {
        let mut builder = CircuitBuilder::new(1);
        builder.h(0).unwrap().measure(0, 0).unwrap();
        let err = Evaluator::default().apply(&builder.build(), None).unwrap_err();
        assert!(matches!(err, KetError::UnsupportedOperation(_)));
    }
}
