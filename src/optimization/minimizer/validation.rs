//! Validation helpers for the minimizer.
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Gradient validation**: [`validate_grad`] enforces correct dimension
//!   and finite entries.
//! - **Parameter estimates**: [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Objective values**: [`validate_value`] checks objective outputs for
//!   finiteness.
//! - **Weights**: [`validate_weights`] checks a weight vector against the
//!   expected nullity before an objective is evaluated.
use crate::optimization::{
    errors::{OptError, OptResult, ToleranceKind},
    minimizer::{Grad, Theta},
};

/// Validate the optional gradient-norm tolerance.
///
/// # Errors
/// [`OptError::InvalidTolerance`] if the value is non-finite or ≤ 0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    verify_tolerance(tol, ToleranceKind::Gradient)
}

/// Validate the optional cost-change tolerance.
///
/// # Errors
/// [`OptError::InvalidTolerance`] if the value is non-finite or ≤ 0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    verify_tolerance(tol, ToleranceKind::CostChange)
}

fn verify_tolerance(tol: Option<f64>, kind: ToleranceKind) -> OptResult<()> {
    match tol {
        Some(value) if !value.is_finite() || value <= 0.0 => {
            Err(OptError::InvalidTolerance { kind, value })
        }
        _ => Ok(()),
    }
}

/// First non-finite entry of `v`, if any.
fn first_non_finite(v: &Theta) -> Option<(usize, f64)> {
    v.iter().enumerate().find(|(_, x)| !x.is_finite()).map(|(i, &x)| (i, x))
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::NonFiniteGradient`] for the first non-finite entry.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    match first_non_finite(grad) {
        Some((index, value)) => Err(OptError::NonFiniteGradient { index, value }),
        None => Ok(()),
    }
}

/// Unwrap the solver's best parameter vector, requiring finite entries.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::NonFiniteThetaHat`] for the first non-finite entry.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let theta_hat = theta_hat.ok_or(OptError::MissingThetaHat)?;
    match first_non_finite(&theta_hat) {
        Some((index, value)) => Err(OptError::NonFiniteThetaHat { index, value }),
        None => Ok(theta_hat),
    }
}

/// Validate that a scalar objective value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate a weight vector against the expected length and finiteness.
///
/// # Errors
/// - [`OptError::WeightLengthMismatch`] if `theta.len() != expected`.
/// - [`OptError::InvalidWeight`] for the first non-finite entry.
pub fn validate_weights(theta: &Theta, expected: usize) -> OptResult<()> {
    if theta.len() != expected {
        return Err(OptError::WeightLengthMismatch { expected, found: theta.len() });
    }
    match first_non_finite(theta) {
        Some((index, value)) => Err(OptError::InvalidWeight { index, value }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the accept/reject behavior of each validation helper
    // on small hand-built inputs.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Tolerances must be finite and strictly positive; `None` is accepted.
    //
    // Expect
    // ------
    // - `None` and `Some(1e-6)` pass; zero, negative and NaN fail.
    fn tolerance_checks_reject_non_positive_and_non_finite() {
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-6)).is_ok());
        assert_eq!(
            verify_tol_grad(Some(0.0)),
            Err(OptError::InvalidTolerance { kind: ToleranceKind::Gradient, value: 0.0 })
        );
        assert_eq!(
            verify_tol_cost(Some(-1.0)),
            Err(OptError::InvalidTolerance { kind: ToleranceKind::CostChange, value: -1.0 })
        );
        assert!(matches!(
            verify_tol_cost(Some(f64::NAN)),
            Err(OptError::InvalidTolerance { kind: ToleranceKind::CostChange, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // `validate_grad` reports dimension mismatches before finiteness.
    //
    // Given
    // -----
    // - A length-2 gradient checked against dim 3, and one with a NaN.
    //
    // Expect
    // ------
    // - `GradientDimMismatch` and `NonFiniteGradient { index: 1, .. }`.
    fn validate_grad_reports_dimension_then_finiteness() {
        let g = array![1.0, 2.0];
        assert_eq!(
            validate_grad(&g, 3),
            Err(OptError::GradientDimMismatch { expected: 3, found: 2 })
        );
        let g_nan = array![1.0, f64::NAN];
        assert!(matches!(validate_grad(&g_nan, 2), Err(OptError::NonFiniteGradient { index: 1, .. })));
    }

    #[test]
    // Purpose
    // -------
    // `validate_theta_hat` unwraps finite vectors and rejects missing ones.
    fn validate_theta_hat_handles_missing_and_non_finite() {
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![f64::INFINITY])),
            Err(OptError::NonFiniteThetaHat { index: 0, .. })
        ));
        assert_eq!(validate_theta_hat(Some(array![0.5])).unwrap(), array![0.5]);
    }

    #[test]
    // Purpose
    // -------
    // `validate_weights` enforces the expected nullity and finiteness.
    fn validate_weights_checks_length_and_values() {
        assert!(validate_weights(&array![0.0, 1.0], 2).is_ok());
        assert_eq!(
            validate_weights(&array![0.0], 2),
            Err(OptError::WeightLengthMismatch { expected: 2, found: 1 })
        );
        assert!(matches!(
            validate_weights(&array![0.0, f64::NAN], 2),
            Err(OptError::InvalidWeight { index: 1, .. })
        ));
        assert!(validate_value(-3.0).is_ok());
        assert!(validate_value(f64::NAN).is_err());
    }
}
