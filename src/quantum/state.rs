//! Quantum state representations
//!
//! This module defines register-wide state vectors, single-qubit states and
//! the four Bell states, together with the tensor product that combines them.

use std::fmt::{self, Debug, Display};

use ndarray::Array1;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_TOLERANCE;
use crate::error::{KetError, Result};
use crate::quantum::gate::constants::FRAC_1_SQRT_2;
use crate::quantum::linalg::{kron_vec, qubits_for_dimension};

/// Trait for quantum states in different representations
pub trait QuantumState: Clone + Debug {
    /// Returns the number of qubits in this quantum state
    fn qubit_count(&self) -> usize;

    /// Returns the dimension of the Hilbert space (2^n for n qubits)
    fn dimension(&self) -> usize {
        1 << self.qubit_count()
    }

    /// Squared norm of the amplitudes
    fn norm_sqr(&self) -> f64;

    /// Check that the state has unit norm within `tolerance`
    fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm_sqr() - 1.0).abs() <= tolerance
    }

    /// Expand into a register-wide state vector
    fn to_state_vector(&self) -> StateVector;
}

/// State vector representation of a quantum state
#[derive(Clone, Debug, PartialEq)]
pub struct StateVector {
    qubit_count: usize,
    amplitudes: Array1<Complex64>,
}

impl StateVector {
    /// Create a new state vector with the given amplitudes.
    ///
    /// The norm is checked against [`DEFAULT_TOLERANCE`]; use
    /// [`with_tolerance`](Self::with_tolerance) to match an evaluator
    /// configured with a different tolerance.
    pub fn new(qubit_count: usize, amplitudes: Array1<Complex64>) -> Result<Self> {
        Self::with_tolerance(qubit_count, amplitudes, DEFAULT_TOLERANCE)
    }

    /// Create a state vector whose norm is within `tolerance` of one
    pub fn with_tolerance(
        qubit_count: usize,
        amplitudes: Array1<Complex64>,
        tolerance: f64,
    ) -> Result<Self> {
        let expected_dim = 1usize << qubit_count;

        if amplitudes.len() != expected_dim {
            return Err(KetError::DimensionMismatch(format!(
                "state vector for {} qubits needs {} amplitudes, got {}",
                qubit_count,
                expected_dim,
                amplitudes.len()
            )));
        }

        let state = StateVector {
            qubit_count,
            amplitudes,
        };

        if !state.is_normalized(tolerance) {
            return Err(KetError::NotNormalized {
                norm: state.norm_sqr().sqrt(),
            });
        }

        Ok(state)
    }

    /// Build a state from raw amplitudes, inferring the qubit count
    pub fn from_amplitudes(amplitudes: Vec<Complex64>) -> Result<Self> {
        let qubit_count = qubits_for_dimension(amplitudes.len()).ok_or_else(|| {
            KetError::DimensionMismatch(format!(
                "state vector length {} is not a power of two",
                amplitudes.len()
            ))
        })?;
        Self::new(qubit_count, Array1::from(amplitudes))
    }

    /// Wrap amplitudes that are already known to be normalized
    pub(crate) fn from_raw(qubit_count: usize, amplitudes: Array1<Complex64>) -> Self {
        StateVector {
            qubit_count,
            amplitudes,
        }
    }

    /// Create a new state vector in the computational basis state |index⟩
    pub fn computational_basis(qubit_count: usize, index: usize) -> Result<Self> {
        let dim = 1usize << qubit_count;

        if index >= dim {
            return Err(KetError::DimensionMismatch(format!(
                "basis index {} is out of range for {}-qubit state",
                index, qubit_count
            )));
        }

        let mut amplitudes = Array1::zeros(dim);
        amplitudes[index] = Complex64::new(1.0, 0.0);

        Ok(StateVector {
            qubit_count,
            amplitudes,
        })
    }

    /// Create the zero state |00...0⟩
    pub fn zero_state(qubit_count: usize) -> Self {
        let mut amplitudes = Array1::zeros(1usize << qubit_count);
        amplitudes[0] = Complex64::new(1.0, 0.0);
        StateVector {
            qubit_count,
            amplitudes,
        }
    }

    /// Product state from a ket label such as `"0+1-"`.
    ///
    /// The leftmost character is the leftmost tensor factor.
    pub fn from_label(label: &str) -> Result<Self> {
        let mut factors = label.chars().map(|ch| match ch {
            '0' => Ok(Qubit::zero()),
            '1' => Ok(Qubit::one()),
            '+' => Ok(Qubit::plus()),
            '-' => Ok(Qubit::minus()),
            other => Err(KetError::DimensionMismatch(format!(
                "unknown ket label character '{}'",
                other
            ))),
        });

        let first = factors
            .next()
            .ok_or_else(|| KetError::DimensionMismatch("empty ket label".to_string()))??;
        factors.try_fold(first.to_state_vector(), |acc, q| {
            Ok(acc.tensor(&q?.to_state_vector()))
        })
    }

    /// One of the four maximally entangled two-qubit states
    pub fn bell(which: BellState) -> Self {
        let h = Complex64::new(FRAC_1_SQRT_2, 0.0);
        let zero = Complex64::new(0.0, 0.0);
        let amplitudes = match which {
            BellState::PhiPlus => [h, zero, zero, h],
            BellState::PhiMinus => [h, zero, zero, -h],
            BellState::PsiPlus => [zero, h, h, zero],
            BellState::PsiMinus => [zero, h, -h, zero],
        };
        StateVector {
            qubit_count: 2,
            amplitudes: Array1::from(amplitudes.to_vec()),
        }
    }

    /// Get a reference to the amplitudes
    pub fn amplitudes(&self) -> &Array1<Complex64> {
        &self.amplitudes
    }

    /// Consume the state, returning its amplitudes
    pub fn into_amplitudes(self) -> Array1<Complex64> {
        self.amplitudes
    }

    /// Tensor product `self ⊗ other`; `self` occupies the high-order bits
    pub fn tensor(&self, other: &Self) -> Self {
        StateVector {
            qubit_count: self.qubit_count + other.qubit_count,
            amplitudes: kron_vec(&self.amplitudes, &other.amplitudes),
        }
    }

    /// Inner product ⟨self|other⟩
    pub fn inner_product(&self, other: &Self) -> Result<Complex64> {
        if self.qubit_count != other.qubit_count {
            return Err(KetError::DimensionMismatch(format!(
                "inner product of {}-qubit and {}-qubit states",
                self.qubit_count, other.qubit_count
            )));
        }

        Ok(self
            .amplitudes
            .iter()
            .zip(other.amplitudes.iter())
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// |⟨self|other⟩|²
    pub fn fidelity(&self, other: &Self) -> Result<f64> {
        Ok(self.inner_product(other)?.norm_sqr())
    }

    /// Calculate the probability of measuring the given basis index
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes
            .get(index)
            .map(|amp| amp.norm_sqr())
            .unwrap_or(0.0)
    }

    /// Probability of every basis index
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).collect()
    }

    /// Amplitude-wise comparison
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.qubit_count == other.qubit_count
            && self
                .amplitudes
                .iter()
                .zip(other.amplitudes.iter())
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }

    /// Equality after removing a global phase
    pub fn equal_up_to_global_phase(&self, other: &Self, tolerance: f64) -> bool {
        match self.fidelity(other) {
            Ok(f) => (f - 1.0).abs() <= tolerance,
            Err(_) => false,
        }
    }

    /// Whether a two-qubit pure state is entangled.
    ///
    /// Uses the concurrence 2|a00·a11 − a01·a10|, which is zero exactly for
    /// product states.
    pub fn is_entangled(&self, tolerance: f64) -> Result<bool> {
        if self.qubit_count != 2 {
            return Err(KetError::DimensionMismatch(format!(
                "entanglement check needs a 2-qubit state, got {} qubits",
                self.qubit_count
            )));
        }
        let a = &self.amplitudes;
        let concurrence = 2.0 * (a[0] * a[3] - a[1] * a[2]).norm();
        Ok(concurrence > tolerance)
    }

    /// Rescale to unit norm; zero vectors are left alone
    pub(crate) fn renormalize(&mut self) {
        let norm = self.norm_sqr().sqrt();
        if norm > 0.0 && (norm - 1.0).abs() > f64::EPSILON {
            self.amplitudes.mapv_inplace(|amp| amp / norm);
        }
    }
}

impl QuantumState for StateVector {
    fn qubit_count(&self) -> usize {
        self.qubit_count
    }

    fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|amp| amp.norm_sqr()).sum()
    }

    fn to_state_vector(&self) -> StateVector {
        self.clone()
    }
}

impl Display for StateVector {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}-qubit state:", self.qubit_count)?;

        let threshold = 1e-10;
        let mut has_entries = false;

        for (i, amp) in self.amplitudes.iter().enumerate() {
            let prob = amp.norm_sqr();
            if prob > threshold {
                has_entries = true;
                let bit_string = format!("{:0width$b}", i, width = self.qubit_count);
                writeln!(
                    f,
                    "  ({:.6}{:+.6}i) |{}⟩ [{:.1}%]",
                    amp.re,
                    amp.im,
                    bit_string,
                    prob * 100.0
                )?;
            }
        }

        if !has_entries {
            writeln!(f, "  (zero state)")?;
        }

        Ok(())
    }
}

/// The four Bell states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BellState {
    /// (|00⟩ + |11⟩)/√2
    PhiPlus,
    /// (|00⟩ − |11⟩)/√2
    PhiMinus,
    /// (|01⟩ + |10⟩)/√2
    PsiPlus,
    /// (|01⟩ − |10⟩)/√2
    PsiMinus,
}

/// A single qubit state α|0⟩ + β|1⟩
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Qubit {
    alpha: Complex64,
    beta: Complex64,
}

impl Qubit {
    /// Create a new qubit state, normalized within [`DEFAULT_TOLERANCE`]
    pub fn new(alpha: Complex64, beta: Complex64) -> Result<Self> {
        Self::with_tolerance(alpha, beta, DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance(alpha: Complex64, beta: Complex64, tolerance: f64) -> Result<Self> {
        let qubit = Qubit { alpha, beta };

        if !qubit.is_normalized(tolerance) {
            return Err(KetError::NotNormalized {
                norm: qubit.norm_sqr().sqrt(),
            });
        }

        Ok(qubit)
    }

    /// Point on the Bloch sphere given by polar angle θ and azimuth φ
    pub fn from_bloch(theta: f64, phi: f64) -> Self {
        Qubit {
            alpha: Complex64::new((theta / 2.0).cos(), 0.0),
            beta: Complex64::from_polar((theta / 2.0).sin(), phi),
        }
    }

    pub fn zero() -> Self {
        Qubit {
            alpha: Complex64::new(1.0, 0.0),
            beta: Complex64::new(0.0, 0.0),
        }
    }

    pub fn one() -> Self {
        Qubit {
            alpha: Complex64::new(0.0, 0.0),
            beta: Complex64::new(1.0, 0.0),
        }
    }

    pub fn plus() -> Self {
        Qubit {
            alpha: Complex64::new(FRAC_1_SQRT_2, 0.0),
            beta: Complex64::new(FRAC_1_SQRT_2, 0.0),
        }
    }

    pub fn minus() -> Self {
        Qubit {
            alpha: Complex64::new(FRAC_1_SQRT_2, 0.0),
            beta: Complex64::new(-FRAC_1_SQRT_2, 0.0),
        }
    }

    pub fn alpha(&self) -> Complex64 {
        self.alpha
    }

    pub fn beta(&self) -> Complex64 {
        self.beta
    }

    /// Bloch sphere angles (θ, φ) after removing the global phase of α
    pub fn bloch_angles(&self) -> (f64, f64) {
        let theta = 2.0 * self.alpha.norm().clamp(0.0, 1.0).acos();
        let phi = if self.beta.norm() < 1e-12 {
            0.0
        } else {
            let relative = self.beta.arg() - self.alpha.arg();
            relative.rem_euclid(2.0 * std::f64::consts::PI)
        };
        (theta, phi)
    }
}

impl QuantumState for Qubit {
    fn qubit_count(&self) -> usize {
        1
    }

    fn norm_sqr(&self) -> f64 {
        self.alpha.norm_sqr() + self.beta.norm_sqr()
    }

    fn to_state_vector(&self) -> StateVector {
        StateVector {
            qubit_count: 1,
            amplitudes: Array1::from(vec![self.alpha, self.beta]),
        }
    }
}
