use num_complex::Complex64;
use std::f64::consts::PI;

use ketsim::quantum::prelude::*;
use ketsim::simulators::Evaluator;
use ketsim::visualization::{render_circuit, render_statevector};
use ketsim::KetError;

fn complex_approx_eq(a: Complex64, b: Complex64, epsilon: f64) -> bool {
    (a - b).norm() < epsilon
}

#[test]
fn test_state_vector_creation() {
    let zero_state = StateVector::zero_state(2);
    assert_eq!(zero_state.qubit_count(), 2);
    assert_eq!(zero_state.dimension(), 4);
    assert!(complex_approx_eq(zero_state.amplitudes()[0], Complex64::new(1.0, 0.0), 1e-12));

    let basis = StateVector::computational_basis(2, 2).unwrap();
    assert_eq!(basis.probability(2), 1.0);
    assert!(StateVector::computational_basis(2, 4).is_err());
}

#[test]
fn test_tensor_product_of_qubits() {
    // |+⟩ ⊗ |1⟩ = (|01⟩ + |11⟩)/√2
    let state = Qubit::plus().to_state_vector().tensor(&Qubit::one().to_state_vector());
    let h = 1.0 / 2.0_f64.sqrt();
    let expected = [0.0, h, 0.0, h];
    for (amp, e) in state.amplitudes().iter().zip(expected.iter()) {
        assert!(complex_approx_eq(*amp, Complex64::new(*e, 0.0), 1e-12));
    }
    assert!(!state.is_entangled(1e-9).unwrap());
    assert!(state.approx_eq(&StateVector::from_label("+1").unwrap(), 1e-12));
}

#[test]
fn test_inner_product_and_fidelity() {
    let plus = Qubit::plus().to_state_vector();
    let minus = Qubit::minus().to_state_vector();
    let zero = Qubit::zero().to_state_vector();

    assert!(plus.inner_product(&minus).unwrap().norm() < 1e-12);
    assert!((plus.fidelity(&zero).unwrap() - 0.5).abs() < 1e-12);
    assert!(matches!(
        plus.inner_product(&StateVector::zero_state(2)),
        Err(KetError::DimensionMismatch(_))
    ));
}

#[test]
fn test_global_phase_equivalence() {
    // Z·X|0⟩ = |1⟩ and X·Z|0⟩ = |1⟩, but Y|0⟩ = i|1⟩ only matches up to phase
    let mut builder = CircuitBuilder::new(1);
    builder.y(0).unwrap();
    let y_state = Evaluator::default().apply(&builder.build(), None).unwrap();
    let one = Qubit::one().to_state_vector();

    assert!(!y_state.approx_eq(&one, 1e-10));
    assert!(y_state.equal_up_to_global_phase(&one, 1e-10));
}

#[test]
fn test_bell_states_from_circuits() {
    // X on the control then H, CNOT gives Φ−; X on the target gives Ψ+
    let evaluator = Evaluator::default();
    let cases = [
        (false, false, BellState::PhiPlus),
        (true, false, BellState::PhiMinus),
        (false, true, BellState::PsiPlus),
        (true, true, BellState::PsiMinus),
    ];

    for (flip_control, flip_target, which) in cases {
        let mut builder = CircuitBuilder::new(2);
        if flip_control {
            builder.x(0).unwrap();
        }
        if flip_target {
            builder.x(1).unwrap();
        }
        builder.bell_pair(0, 1).unwrap();
        let state = evaluator.apply(&builder.build(), None).unwrap();
        assert!(state.approx_eq(&StateVector::bell(which), 1e-10), "{:?}", which);
    }
}

#[test]
fn test_qubit_on_bloch_sphere() {
    let q = Qubit::from_bloch(PI / 2.0, PI / 2.0);
    // |+i⟩ = (|0⟩ + i|1⟩)/√2
    let h = 1.0 / 2.0_f64.sqrt();
    assert!(complex_approx_eq(q.alpha(), Complex64::new(h, 0.0), 1e-12));
    assert!(complex_approx_eq(q.beta(), Complex64::new(0.0, h), 1e-12));
    assert!(Qubit::new(Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)).is_err());
}

#[test]
fn test_circuit_adjoint_undoes_circuit() {
    let mut builder = CircuitBuilder::new(2);
    builder.h(0).unwrap();
    builder.s(1).unwrap();
    builder.sx(0).unwrap();
    builder.cnot(0, 1).unwrap();
    builder.rz(1, 0.4).unwrap();
    builder.phase(0, 1.3).unwrap();
    let circuit = builder.build();

    let round_trip = circuit.compose(&circuit.adjoint().unwrap()).unwrap();
    let state = Evaluator::default().apply(&round_trip, None).unwrap();
    assert!(state.approx_eq(&StateVector::zero_state(2), 1e-10));
}

#[test]
fn test_rendering() {
    let mut builder = CircuitBuilder::new(2);
    builder.bell_pair(0, 1).unwrap();
    let circuit = builder.build();
    assert_eq!(circuit.to_string(), render_circuit(&circuit));

    let state = Evaluator::default().apply(&circuit, None).unwrap();
    let table = render_statevector(&state);
    assert_eq!(table.lines().count(), 4);
    assert!(table.lines().next().unwrap().starts_with("|00⟩"));
    assert!(state.to_string().contains("|11⟩"));
}
