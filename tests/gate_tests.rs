use ndarray::Array2;
use num_complex::Complex64;
use std::f64::consts::PI;

use ketsim::config::QubitOrdering;
use ketsim::quantum::gate::*;
use ketsim::quantum::linalg::{identity, kron, max_abs_diff};
use ketsim::simulators::Evaluator;

fn matrix_approx_eq(a: &Array2<Complex64>, b: &Array2<Complex64>) -> bool {
    max_abs_diff(a, b) < 1e-10
}

#[test]
fn test_hzh_equals_x() {
    let h = StandardGate::H.matrix();
    let hzh = h.dot(&StandardGate::Z.matrix()).dot(&h);
    assert!(matrix_approx_eq(&hzh, &StandardGate::X.matrix()));
}

#[test]
fn test_rotations_match_paulis_at_pi() {
    // Rx(π) = -iX, Rz(π) = -iZ
    let minus_i = Complex64::new(0.0, -1.0);
    let rx = ParametrizedGate::Rx(PI).matrix();
    assert!(matrix_approx_eq(&rx, &StandardGate::X.matrix().mapv(|z| z * minus_i)));
    let rz = ParametrizedGate::Rz(PI).matrix();
    assert!(matrix_approx_eq(&rz, &StandardGate::Z.matrix().mapv(|z| z * minus_i)));

    // Phase(π/2) = S, Phase(π/4) = T
    assert!(matrix_approx_eq(&ParametrizedGate::Phase(PI / 2.0).matrix(), &StandardGate::S.matrix()));
    assert!(matrix_approx_eq(&ParametrizedGate::Phase(PI / 4.0).matrix(), &StandardGate::T.matrix()));
}

#[test]
fn test_u3_generalizes_hadamard() {
    // U3(π/2, 0, π) = H
    let u3 = ParametrizedGate::U3(PI / 2.0, 0.0, PI).matrix();
    assert!(matrix_approx_eq(&u3, &StandardGate::H.matrix()));
}

#[test]
fn test_full_register_operator_is_kronecker_with_identity() {
    let evaluator = Evaluator::default();
    let h = StandardGate::H.matrix();

    // Big-endian: H on qubit 1 of 3 is I ⊗ H ⊗ I
    let expanded = evaluator.expand_operator(&h, &[1], 3).unwrap();
    let expected = kron(&kron(&identity(2), &h), &identity(2));
    assert!(matrix_approx_eq(&expanded, &expected));

    // CNOT on adjacent qubits (0, 1) of 3 is CNOT ⊗ I
    let cnot = StandardGate::CNOT.matrix();
    let expanded = evaluator.expand_operator(&cnot, &[0, 1], 3).unwrap();
    assert!(matrix_approx_eq(&expanded, &kron(&cnot, &identity(2))));
}

#[test]
fn test_reversed_cnot_is_hadamard_conjugate() {
    // CNOT(1 → 0) = (H ⊗ H) CNOT(0 → 1) (H ⊗ H)
    let evaluator = Evaluator::default();
    let cnot = StandardGate::CNOT.matrix();
    let reversed = evaluator.expand_operator(&cnot, &[1, 0], 2).unwrap();

    let hh = kron(&StandardGate::H.matrix(), &StandardGate::H.matrix());
    let conjugated = hh.dot(&cnot).dot(&hh);
    assert!(matrix_approx_eq(&reversed, &conjugated));
}

#[test]
fn test_swap_expansion_is_ordering_independent() {
    for ordering in [QubitOrdering::BigEndian, QubitOrdering::LittleEndian] {
        let swap = StandardGate::SWAP.matrix();
        let expanded =
            ketsim::quantum::linalg::expand_operator(&swap, &[0, 1], 2, ordering).unwrap();
        assert!(matrix_approx_eq(&expanded, &swap));
    }
}

#[test]
fn test_toffoli_flips_only_when_both_controls_set() {
    let toffoli = StandardGate::Toffoli.matrix();
    for input in 0..8usize {
        let expected = if input & 0b110 == 0b110 { input ^ 1 } else { input };
        assert_eq!(toffoli[[expected, input]], Complex64::new(1.0, 0.0));
    }
}

#[test]
fn test_adjoint_names_and_involutions() {
    assert_eq!(StandardGate::S.adjoint().name(), "Sdg");
    assert_eq!(StandardGate::T.adjoint().name(), "Tdg");
    assert_eq!(ParametrizedGate::Rx(0.5).adjoint().name(), "Rx(-0.50)");
    assert!(StandardGate::SWAP.is_involution());
    assert!(!StandardGate::S.is_involution());

    let boxed: Box<dyn QuantumGate> = Box::new(StandardGate::H);
    assert!(boxed == boxed.adjoint());
}

#[test]
fn test_custom_gate_accepts_unitary() {
    let gate = CustomMatrixGate::new("iswap-ish", ParametrizedGate::CRy(1.0).matrix(), 1e-9).unwrap();
    assert_eq!(gate.qubit_count(), 2);
    assert_eq!(gate.name(), "iswap-ish");
}
