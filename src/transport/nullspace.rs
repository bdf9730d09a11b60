//! Nullspace solver and minimum-norm least squares.
//!
//! Both operations go through a singular value decomposition (`nalgebra`)
//! of the coefficient matrix. The matrix is converted from `ndarray` on the
//! way in and the results are converted back; nothing is cached between
//! calls.
//!
//! Conventions
//! -----------
//! - The nullspace basis is returned as columns, shape
//!   `(n_columns, nullity)`, with orthonormal columns.
//! - A singular value counts as zero when it is at or below
//!   `max(atol, rtol · s_max)`; singular values are never assumed sorted.
//! - Least squares uses the pseudo-inverse with cutoff
//!   `ε · max(m, n) · s_max`, the usual LAPACK default.
use crate::transport::{
    core::NullspaceTolerance,
    errors::{TransportError, TransportResult},
};
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

/// Orthonormal basis of the nullspace of `matrix`.
///
/// Wide matrices are zero-padded to at least `n_columns` rows before the
/// decomposition so every right singular vector is available; padding
/// leaves the row space unchanged.
///
/// # Errors
/// - `TransportError::LinearAlgebra` if the matrix has non-finite entries
///   or the decomposition fails.
pub fn nullspace(matrix: &Array2<f64>, tol: NullspaceTolerance) -> TransportResult<Array2<f64>> {
    let (m, n) = matrix.dim();
    ensure_finite(matrix)?;
    if n == 0 {
        return Ok(Array2::zeros((0, 0)));
    }

    let padded = DMatrix::from_fn(m.max(n), n, |i, j| if i < m { matrix[[i, j]] } else { 0.0 });
    let svd = padded.try_svd(false, true, f64::EPSILON, 0).ok_or_else(|| {
        TransportError::LinearAlgebra { reason: "SVD did not converge".to_string() }
    })?;
    let v_t = svd.v_t.ok_or_else(|| TransportError::LinearAlgebra {
        reason: "SVD returned no right singular vectors".to_string(),
    })?;

    let singular = &svd.singular_values;
    let threshold = tol.threshold(max_abs(singular.iter()));
    let free: Vec<usize> = (0..singular.len()).filter(|&k| singular[k] <= threshold).collect();

    let mut basis = Array2::<f64>::zeros((n, free.len()));
    for (c, &k) in free.iter().enumerate() {
        for j in 0..n {
            basis[[j, c]] = v_t[(k, j)];
        }
    }
    log::debug!("nullspace: {m}x{n} matrix, threshold {threshold:e}, nullity {}", free.len());
    Ok(basis)
}

/// Minimum-norm least-squares solution of `matrix · x ≈ rhs`.
///
/// # Errors
/// - `TransportError::ConcentrationLengthMismatch` if `rhs.len()` differs
///   from the number of rows.
/// - `TransportError::LinearAlgebra` for non-finite input or a failed
///   decomposition.
pub fn least_squares(matrix: &Array2<f64>, rhs: &Array1<f64>) -> TransportResult<Array1<f64>> {
    let (m, n) = matrix.dim();
    if rhs.len() != m {
        return Err(TransportError::ConcentrationLengthMismatch { expected: m, found: rhs.len() });
    }
    ensure_finite(matrix)?;
    if let Some((index, &value)) = rhs.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(TransportError::NonFiniteData { index, value });
    }
    if m == 0 || n == 0 {
        return Ok(Array1::zeros(n));
    }

    let a = DMatrix::from_fn(m, n, |i, j| matrix[[i, j]]);
    let b = DVector::from_iterator(m, rhs.iter().copied());
    let svd = a.try_svd(true, true, f64::EPSILON, 0).ok_or_else(|| {
        TransportError::LinearAlgebra { reason: "SVD did not converge".to_string() }
    })?;
    let cutoff = f64::EPSILON * m.max(n) as f64 * max_abs(svd.singular_values.iter());
    let x = svd
        .solve(&b, cutoff)
        .map_err(|reason| TransportError::LinearAlgebra { reason: reason.to_string() })?;
    Ok(x.iter().copied().collect())
}

fn ensure_finite(matrix: &Array2<f64>) -> TransportResult<()> {
    if let Some(value) = matrix.iter().find(|v| !v.is_finite()) {
        return Err(TransportError::LinearAlgebra {
            reason: format!("matrix contains a non-finite entry: {value}"),
        });
    }
    Ok(())
}

fn max_abs<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.fold(0.0_f64, |acc, v| acc.max(v.abs()))
}
