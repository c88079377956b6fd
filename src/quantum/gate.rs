//! Quantum gates
//!
//! A gate is a unitary matrix plus a qubit arity. The local matrix index of a
//! multi-qubit gate reads its first target as the most significant bit, so
//! `CNOT` on `[control, target]` flips `target` when `control` is set.

use std::fmt::Debug;

use ndarray::{array, Array2};
use num_complex::Complex64;

use crate::error::{KetError, Result};
use crate::quantum::linalg::{self, qubits_for_dimension};

/// Common complex numbers used in quantum gates
pub mod constants {
    use num_complex::Complex64;

    pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);
    pub const ONE: Complex64 = Complex64::new(1.0, 0.0);
    /// The imaginary unit i
    pub const I: Complex64 = Complex64::new(0.0, 1.0);
    /// 1/sqrt(2)
    pub const FRAC_1_SQRT_2: f64 = std::f64::consts::FRAC_1_SQRT_2;
}

use constants::{FRAC_1_SQRT_2, I, ONE, ZERO};

/// Trait for quantum gates
pub trait QuantumGate: Debug + Send + Sync {
    /// Returns the number of qubits this gate acts on
    fn qubit_count(&self) -> usize;

    /// Returns the matrix representation of this gate
    fn matrix(&self) -> Array2<Complex64>;

    /// Returns a display name for this gate
    fn name(&self) -> String;

    /// Create a clone of this gate
    fn clone_box(&self) -> Box<dyn QuantumGate>;

    /// Returns the adjoint (Hermitian conjugate) of this gate
    fn adjoint(&self) -> Box<dyn QuantumGate> {
        Box::new(CustomMatrixGate {
            matrix: linalg::adjoint(&self.matrix()),
            name: format!("{}†", self.name()),
            qubits: self.qubit_count(),
        })
    }

    /// Whether the matrix satisfies U†U = I within `tolerance`
    fn is_unitary(&self, tolerance: f64) -> bool {
        linalg::is_unitary(&self.matrix(), tolerance)
    }

    /// Compares this gate with another gate by matrix
    fn equals(&self, other: &dyn QuantumGate) -> bool {
        linalg::max_abs_diff(&self.matrix(), &other.matrix()) < 1e-10
    }
}

impl Clone for Box<dyn QuantumGate> {
    fn clone(&self) -> Box<dyn QuantumGate> {
        self.clone_box()
    }
}

impl PartialEq for Box<dyn QuantumGate> {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other.as_ref())
    }
}

/// A gate defined directly by its matrix
#[derive(Debug, Clone)]
pub struct CustomMatrixGate {
    matrix: Array2<Complex64>,
    name: String,
    qubits: usize,
}

impl CustomMatrixGate {
    /// Create a gate, checking the matrix is square, power-of-two sized and unitary
    pub fn new(name: impl Into<String>, matrix: Array2<Complex64>, tolerance: f64) -> Result<Self> {
        let gate = Self::unchecked(name, matrix)?;
        if !gate.is_unitary(tolerance) {
            return Err(KetError::InvalidGate {
                name: gate.name,
                reason: "matrix is not unitary".to_string(),
            });
        }
        Ok(gate)
    }

    /// Create a gate checking only its shape.
    ///
    /// Unitarity is verified later by the evaluator, which rejects the gate
    /// with [`KetError::InvalidGate`].
    pub fn unchecked(name: impl Into<String>, matrix: Array2<Complex64>) -> Result<Self> {
        let name = name.into();
        let (rows, cols) = matrix.dim();
        let qubits = match qubits_for_dimension(rows) {
            Some(q) if rows == cols && q > 0 => q,
            _ => {
                return Err(KetError::InvalidGate {
                    name,
                    reason: format!("{}x{} is not a 2^k square matrix", rows, cols),
                })
            }
        };
        Ok(CustomMatrixGate {
            matrix,
            name,
            qubits,
        })
    }
}

impl QuantumGate for CustomMatrixGate {
    fn qubit_count(&self) -> usize {
        self.qubits
    }

    fn matrix(&self) -> Array2<Complex64> {
        self.matrix.clone()
    }

    fn name(&self) -> String {
        self.name.clone()
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }
}

/// Standard fixed gates
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StandardGate {
    /// Identity on the given number of qubits
    I(usize),
    X,
    Y,
    Z,
    /// Hadamard
    H,
    /// Phase gate, √Z
    S,
    Sdg,
    /// π/8 gate, √S
    T,
    Tdg,
    /// √X
    SX,
    CNOT,
    CZ,
    CY,
    SWAP,
    /// Doubly controlled NOT
    Toffoli,
}

/// Matrix of a gate controlled on the first of its qubits
fn controlled(target: &Array2<Complex64>) -> Array2<Complex64> {
    let n = target.nrows();
    let mut matrix = linalg::identity(2 * n);
    matrix
        .slice_mut(ndarray::s![n.., n..])
        .assign(target);
    matrix
}

impl StandardGate {
    /// Whether applying the gate twice is the identity
    pub fn is_involution(&self) -> bool {
        matches!(
            self,
            StandardGate::I(_)
                | StandardGate::X
                | StandardGate::Y
                | StandardGate::Z
                | StandardGate::H
                | StandardGate::CNOT
                | StandardGate::CZ
                | StandardGate::CY
                | StandardGate::SWAP
                | StandardGate::Toffoli
        )
    }
}

impl QuantumGate for StandardGate {
    fn qubit_count(&self) -> usize {
        match self {
            StandardGate::I(n) => *n,
            StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX => 1,
            StandardGate::CNOT | StandardGate::CZ | StandardGate::CY | StandardGate::SWAP => 2,
            StandardGate::Toffoli => 3,
        }
    }

    fn matrix(&self) -> Array2<Complex64> {
        match self {
            StandardGate::I(n) => linalg::identity(1 << *n),
            StandardGate::X => array![[ZERO, ONE], [ONE, ZERO]],
            StandardGate::Y => array![[ZERO, -I], [I, ZERO]],
            StandardGate::Z => array![[ONE, ZERO], [ZERO, -ONE]],
            StandardGate::H => {
                let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
                array![[h, h], [h, -h]]
            }
            StandardGate::S => array![[ONE, ZERO], [ZERO, I]],
            StandardGate::Sdg => array![[ONE, ZERO], [ZERO, -I]],
            StandardGate::T => array![
                [ONE, ZERO],
                [ZERO, Complex64::new(FRAC_1_SQRT_2, FRAC_1_SQRT_2)]
            ],
            StandardGate::Tdg => array![
                [ONE, ZERO],
                [ZERO, Complex64::new(FRAC_1_SQRT_2, -FRAC_1_SQRT_2)]
            ],
            StandardGate::SX => {
                let p = Complex64::new(0.5, 0.5);
                let m = Complex64::new(0.5, -0.5);
                array![[p, m], [m, p]]
            }
            StandardGate::CNOT => controlled(&StandardGate::X.matrix()),
            StandardGate::CZ => controlled(&StandardGate::Z.matrix()),
            StandardGate::CY => controlled(&StandardGate::Y.matrix()),
            StandardGate::SWAP => array![
                [ONE, ZERO, ZERO, ZERO],
                [ZERO, ZERO, ONE, ZERO],
                [ZERO, ONE, ZERO, ZERO],
                [ZERO, ZERO, ZERO, ONE]
            ],
            StandardGate::Toffoli => controlled(&StandardGate::CNOT.matrix()),
        }
    }

    fn name(&self) -> String {
        match self {
            StandardGate::I(n) => format!("I({})", n),
            other => format!("{:?}", other),
        }
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }

    fn adjoint(&self) -> Box<dyn QuantumGate> {
        match self {
            StandardGate::S => Box::new(StandardGate::Sdg),
            StandardGate::Sdg => Box::new(StandardGate::S),
            StandardGate::T => Box::new(StandardGate::Tdg),
            StandardGate::Tdg => Box::new(StandardGate::T),
            StandardGate::SX => Box::new(CustomMatrixGate {
                matrix: linalg::adjoint(&self.matrix()),
                name: "SXdg".to_string(),
                qubits: 1,
            }),
            // Everything else is Hermitian
            _ => self.clone_box(),
        }
    }
}

/// Gates with a continuous angle parameter
#[derive(Clone, Debug, PartialEq)]
pub enum ParametrizedGate {
    /// Rotation around X-axis
    Rx(f64),
    /// Rotation around Y-axis
    Ry(f64),
    /// Rotation around Z-axis
    Rz(f64),
    /// diag(1, e^{iθ})
    Phase(f64),
    /// General single-qubit unitary U3(θ, φ, λ)
    U3(f64, f64, f64),
    CRx(f64),
    CRy(f64),
    CRz(f64),
    CPhase(f64),
}

impl ParametrizedGate {
    fn rx(theta: f64) -> Array2<Complex64> {
        let cos = Complex64::new((theta / 2.0).cos(), 0.0);
        let isin = Complex64::new(0.0, -(theta / 2.0).sin());
        array![[cos, isin], [isin, cos]]
    }

    fn ry(theta: f64) -> Array2<Complex64> {
        let cos = Complex64::new((theta / 2.0).cos(), 0.0);
        let sin = Complex64::new((theta / 2.0).sin(), 0.0);
        array![[cos, -sin], [sin, cos]]
    }

    fn rz(theta: f64) -> Array2<Complex64> {
        array![
            [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
            [ZERO, Complex64::from_polar(1.0, theta / 2.0)]
        ]
    }

    fn phase(theta: f64) -> Array2<Complex64> {
        array![[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, theta)]]
    }
}

impl QuantumGate for ParametrizedGate {
    fn qubit_count(&self) -> usize {
        match self {
            ParametrizedGate::Rx(_)
            | ParametrizedGate::Ry(_)
            | ParametrizedGate::Rz(_)
            | ParametrizedGate::Phase(_)
            | ParametrizedGate::U3(..) => 1,
            ParametrizedGate::CRx(_)
            | ParametrizedGate::CRy(_)
            | ParametrizedGate::CRz(_)
            | ParametrizedGate::CPhase(_) => 2,
        }
    }

    fn matrix(&self) -> Array2<Complex64> {
        match *self {
            ParametrizedGate::Rx(theta) => Self::rx(theta),
            ParametrizedGate::Ry(theta) => Self::ry(theta),
            ParametrizedGate::Rz(theta) => Self::rz(theta),
            ParametrizedGate::Phase(theta) => Self::phase(theta),
            ParametrizedGate::U3(theta, phi, lambda) => {
                let cos = (theta / 2.0).cos();
                let sin = (theta / 2.0).sin();
                array![
                    [Complex64::new(cos, 0.0), -Complex64::from_polar(sin, lambda)],
                    [
                        Complex64::from_polar(sin, phi),
                        Complex64::from_polar(cos, phi + lambda)
                    ]
                ]
            }
            ParametrizedGate::CRx(theta) => controlled(&Self::rx(theta)),
            ParametrizedGate::CRy(theta) => controlled(&Self::ry(theta)),
            ParametrizedGate::CRz(theta) => controlled(&Self::rz(theta)),
            ParametrizedGate::CPhase(theta) => controlled(&Self::phase(theta)),
        }
    }

    fn name(&self) -> String {
        match self {
            ParametrizedGate::Rx(theta) => format!("Rx({:.2})", theta),
            ParametrizedGate::Ry(theta) => format!("Ry({:.2})", theta),
            ParametrizedGate::Rz(theta) => format!("Rz({:.2})", theta),
            ParametrizedGate::Phase(theta) => format!("P({:.2})", theta),
            ParametrizedGate::U3(theta, phi, lambda) => {
                format!("U3({:.2}, {:.2}, {:.2})", theta, phi, lambda)
            }
            ParametrizedGate::CRx(theta) => format!("CRx({:.2})", theta),
            ParametrizedGate::CRy(theta) => format!("CRy({:.2})", theta),
            ParametrizedGate::CRz(theta) => format!("CRz({:.2})", theta),
            ParametrizedGate::CPhase(theta) => format!("CP({:.2})", theta),
        }
    }

    fn clone_box(&self) -> Box<dyn QuantumGate> {
        Box::new(self.clone())
    }

    fn adjoint(&self) -> Box<dyn QuantumGate> {
        let inverse = match *self {
            ParametrizedGate::Rx(theta) => ParametrizedGate::Rx(-theta),
            ParametrizedGate::Ry(theta) => ParametrizedGate::Ry(-theta),
            ParametrizedGate::Rz(theta) => ParametrizedGate::Rz(-theta),
            ParametrizedGate::Phase(theta) => ParametrizedGate::Phase(-theta),
            ParametrizedGate::U3(theta, phi, lambda) => ParametrizedGate::U3(-theta, -lambda, -phi),
            ParametrizedGate::CRx(theta) => ParametrizedGate::CRx(-theta),
            ParametrizedGate::CRy(theta) => ParametrizedGate::CRy(-theta),
            ParametrizedGate::CRz(theta) => ParametrizedGate::CRz(-theta),
            ParametrizedGate::CPhase(theta) => ParametrizedGate::CPhase(-theta),
        };
        Box::new(inverse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn assert_inverse(gate: &dyn QuantumGate) {
        let product = gate.adjoint().matrix().dot(&gate.matrix());
        let identity = linalg::identity(1 << gate.qubit_count());
        assert!(
            linalg::max_abs_diff(&product, &identity) < 1e-10,
            "adjoint of {} is not its inverse",
            gate.name()
        );
    }

    #[test]
    fn test_standard_gates_unitary_with_inverse_adjoint() {
        let gates = [
            StandardGate::I(2),
            StandardGate::X,
            StandardGate::Y,
            StandardGate::Z,
            StandardGate::H,
            StandardGate::S,
            StandardGate::Sdg,
            StandardGate::T,
            StandardGate::Tdg,
            StandardGate::SX,
            StandardGate::CNOT,
            StandardGate::CZ,
            StandardGate::CY,
            StandardGate::SWAP,
            StandardGate::Toffoli,
        ];
        for gate in &gates {
            assert!(gate.is_unitary(1e-10), "{} not unitary", gate.name());
            assert_eq!(gate.matrix().nrows(), 1 << gate.qubit_count());
            assert_inverse(gate);
        }
    }

    #[test]
    fn test_parametrized_gates_unitary_with_inverse_adjoint() {
        let gates = [
            ParametrizedGate::Rx(0.3),
            ParametrizedGate::Ry(1.1),
            ParametrizedGate::Rz(-0.7),
            ParametrizedGate::Phase(PI / 5.0),
            ParametrizedGate::U3(0.4, 1.2, -2.0),
            ParametrizedGate::CRx(0.9),
            ParametrizedGate::CRy(2.5),
            ParametrizedGate::CRz(PI),
            ParametrizedGate::CPhase(PI / 3.0),
        ];
        for gate in &gates {
            assert!(gate.is_unitary(1e-10), "{} not unitary", gate.name());
            assert_inverse(gate);
        }
    }

    #[test]
    fn test_sx_squares_to_x() {
        let sx = StandardGate::SX.matrix();
        let diff = linalg::max_abs_diff(&sx.dot(&sx), &StandardGate::X.matrix());
        assert!(diff < 1e-12);
    }

    #[test]
    fn test_custom_gate_validation() {
        let not_unitary = array![[ONE, ONE], [ZERO, ONE]];
        let err = CustomMatrixGate::new("shear", not_unitary.clone(), 1e-9).unwrap_err();
        assert!(matches!(err, KetError::InvalidGate { .. }));

        // Shape-only construction succeeds so the evaluator can reject it later
        let gate = CustomMatrixGate::unchecked("shear", not_unitary).unwrap();
        assert_eq!(gate.qubit_count(), 1);
        assert!(!gate.is_unitary(1e-9));

        let wrong_shape = Array2::from_elem((3, 3), ONE);
        assert!(CustomMatrixGate::unchecked("bad", wrong_shape).is_err());
    }
}
