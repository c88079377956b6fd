//! Small dense linear-algebra helpers over `Complex64`
//!
//! Everything here works on `ndarray` containers so that gate matrices,
//! composed unitaries and state amplitudes share a single representation.

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rayon::prelude::*;

use crate::config::QubitOrdering;
use crate::error::{KetError, Result};

/// The n×n identity over complex numbers
pub fn identity(dim: usize) -> Array2<Complex64> {
    Array2::from_diag(&Array1::from_elem(dim, Complex64::new(1.0, 0.0)))
}

/// Kronecker product `a ⊗ b`
pub fn kron(a: &Array2<Complex64>, b: &Array2<Complex64>) -> Array2<Complex64> {
    let (a_rows, a_cols) = a.dim();
    let (b_rows, b_cols) = b.dim();
    let mut result = Array2::zeros((a_rows * b_rows, a_cols * b_cols));

    for i in 0..a_rows {
        for j in 0..a_cols {
            let factor = a[[i, j]];
            if factor == Complex64::new(0.0, 0.0) {
                continue;
            }
            for k in 0..b_rows {
                for l in 0..b_cols {
                    result[[i * b_rows + k, j * b_cols + l]] = factor * b[[k, l]];
                }
            }
        }
    }

    result
}

/// Kronecker product of two vectors
pub fn kron_vec(a: &Array1<Complex64>, b: &Array1<Complex64>) -> Array1<Complex64> {
    let mut result = Array1::zeros(a.len() * b.len());
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            result[i * b.len() + j] = x * y;
        }
    }
    result
}

/// Conjugate transpose
pub fn adjoint(matrix: &Array2<Complex64>) -> Array2<Complex64> {
    matrix.t().mapv(|z| z.conj())
}

/// Largest elementwise distance between two equally shaped matrices
pub fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    if a.dim() != b.dim() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// Whether `matrix` is square and satisfies U†U = I within `tolerance`
pub fn is_unitary(matrix: &Array2<Complex64>, tolerance: f64) -> bool {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return false;
    }
    let product = adjoint(matrix).dot(matrix);
    max_abs_diff(&product, &identity(rows)) <= tolerance
}

/// Number of qubits a square matrix of side `dim` acts on, if `dim` is a power of two
pub fn qubits_for_dimension(dim: usize) -> Option<usize> {
    if dim == 0 || !dim.is_power_of_two() {
        None
    } else {
        Some(dim.trailing_zeros() as usize)
    }
}

/// Matrix-vector product, split across rayon workers once `dim >= parallel_threshold`
pub fn mat_vec(
    matrix: &Array2<Complex64>,
    vector: &Array1<Complex64>,
    parallel_threshold: usize,
) -> Array1<Complex64> {
    let dim = vector.len();
    if dim < parallel_threshold {
        return matrix.dot(vector);
    }

    let rows: Vec<Complex64> = (0..matrix.nrows())
        .into_par_iter()
        .map(|i| matrix.row(i).dot(vector))
        .collect();
    Array1::from(rows)
}

/// Embed a local gate matrix into a `total_qubits` register.
///
/// The result equals `I ⊗ … ⊗ U ⊗ … ⊗ I` with the factors permuted so that
/// `U` lands on `targets`. `targets[0]` is the most significant bit of the
/// local matrix index regardless of `ordering`; `ordering` only decides where
/// each register qubit sits in the full basis index.
pub fn expand_operator(
    local: &Array2<Complex64>,
    targets: &[usize],
    total_qubits: usize,
    ordering: QubitOrdering,
) -> Result<Array2<Complex64>> {
    let k = targets.len();
    let local_dim = 1usize << k;
    if local.dim() != (local_dim, local_dim) {
        return Err(KetError::DimensionMismatch(format!(
            "{}x{} matrix cannot act on {} qubits",
            local.nrows(),
            local.ncols(),
            k
        )));
    }
    for (pos, &q) in targets.iter().enumerate() {
        if q >= total_qubits {
            return Err(KetError::qubit_out_of_range(q, total_qubits));
        }
        if targets[..pos].contains(&q) {
            return Err(KetError::DimensionMismatch(format!(
                "qubit {} listed twice for one gate",
                q
            )));
        }
    }

    let shifts: Vec<usize> = targets
        .iter()
        .map(|&q| ordering.shift(q, total_qubits))
        .collect();
    let target_mask: usize = shifts.iter().map(|s| 1usize << s).sum();

    // Scatter a local index onto the register bit positions of the targets
    let scatter = |local_index: usize| -> usize {
        shifts.iter().enumerate().fold(0, |acc, (t, &shift)| {
            acc | (((local_index >> (k - 1 - t)) & 1) << shift)
        })
    };
    let gather = |full_index: usize| -> usize {
        shifts.iter().enumerate().fold(0, |acc, (t, &shift)| {
            acc | (((full_index >> shift) & 1) << (k - 1 - t))
        })
    };

    let dim = 1usize << total_qubits;
    let mut result = Array2::zeros((dim, dim));
    for col in 0..dim {
        let base = col & !target_mask;
        let sub_col = gather(col);
        for sub_row in 0..local_dim {
            let entry = local[[sub_row, sub_col]];
            if entry != Complex64::new(0.0, 0.0) {
                result[[base | scatter(sub_row), col]] = entry;
            }
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    #[test]
    fn test_expand_matches_kron_with_identity() {
        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        let i2 = identity(2);

        // Big-endian: qubit 0 is the leftmost factor
        let expanded = expand_operator(&x, &[0], 2, QubitOrdering::BigEndian).unwrap();
        assert!(max_abs_diff(&expanded, &kron(&x, &i2)) < 1e-12);

        // Little-endian: qubit 0 is the rightmost factor
        let expanded = expand_operator(&x, &[0], 2, QubitOrdering::LittleEndian).unwrap();
        assert!(max_abs_diff(&expanded, &kron(&i2, &x)) < 1e-12);
    }

    #[test]
    fn test_expand_rejects_bad_targets() {
        let x = array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]];
        assert!(matches!(
            expand_operator(&x, &[3], 2, QubitOrdering::BigEndian),
            Err(KetError::DimensionMismatch(_))
        ));
        assert!(matches!(
            expand_operator(&x, &[0, 1], 2, QubitOrdering::BigEndian),
            Err(KetError::DimensionMismatch(_))
        ));
    }

    #[test]
    fn test_unitarity() {
        let h = 1.0 / 2.0_f64.sqrt();
        let hadamard = array![[c(h), c(h)], [c(h), c(-h)]];
        assert!(is_unitary(&hadamard, 1e-9));

        let not_unitary = array![[c(1.0), c(1.0)], [c(0.0), c(1.0)]];
        assert!(!is_unitary(&not_unitary, 1e-9));
    }

    #[test]
    fn test_parallel_mat_vec_matches_serial() {
        let m = kron(&identity(4), &array![[c(0.0), c(1.0)], [c(1.0), c(0.0)]]);
        let v = Array1::from((0..8).map(|i| c(i as f64)).collect::<Vec<_>>());
        let serial = mat_vec(&m, &v, usize::MAX);
        let parallel = mat_vec(&m, &v, 0);
        assert_eq!(serial, parallel);
    }
}
