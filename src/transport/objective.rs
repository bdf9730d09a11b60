//! Nullspace objectives: which member of the exact-solution family to pick.
//!
//! Purpose
//! -------
//! Every deposition vector `x = x_ls + N · w` reproduces the observations
//! equally well. The objective scores the weights `w` so the optimizer can
//! choose a single, physically plausible member of that family.
//!
//! Key behaviors
//! -------------
//! - [`NullspaceObjective`] is the caller-facing choice: squared first
//!   differences, absolute first differences, or a caller-supplied function
//!   of `(w, x_ls, N)`. Names parse via `FromStr`.
//! - [`NullspaceCost`] adapts one concrete stage to the optimizer's
//!   [`Objective`] trait, with analytic gradients for both built-in
//!   criteria. Custom objectives fall back to finite differences.
//! - Summed lengths are minimized through the smooth stand-in
//!   `Σ sqrt(d² + ε²)`, which L-BFGS can handle; the stage reports the
//!   unsmoothed `Σ |d|`.
//!
//! Conventions
//! -----------
//! - `ε` = [`SUMMED_LENGTHS_SMOOTHING`] × `max |x_ls|` (× 1 when `x_ls` is
//!   zero), see [`summed_lengths_smoothing`]. The stand-in lies between
//!   `Σ |d|` and `Σ |d| + (n − 1) ε`.
//! - Custom objectives must return a finite value; a non-finite value
//!   aborts the optimization with an error.
use crate::{
    optimization::{
        errors::{OptError, OptResult},
        minimizer::{Cost, Grad, Objective, Theta, validation::validate_weights},
    },
    transport::errors::{OptimizationStage, TransportError},
};
use ndarray::{Array1, Array2, s};
use std::{fmt, str::FromStr, sync::Arc};

/// Caller-supplied objective `f(w, x_ls, N) -> cost`.
pub type CustomObjectiveFn = dyn Fn(&Array1<f64>, &Array1<f64>, &Array2<f64>) -> f64 + Send + Sync;

/// Regularization criterion applied inside the nullspace.
///
/// - `SquaredLengths`: minimize `Σ (x[i+1] − x[i])²`.
/// - `SummedLengths`: minimize `Σ |x[i+1] − x[i]|`, warm-started from the
///   squared-lengths solution.
/// - `Custom`: minimize a caller function, warm-started the same way.
#[derive(Clone, Default)]
pub enum NullspaceObjective {
    #[default]
    SquaredLengths,
    SummedLengths,
    Custom(Arc<CustomObjectiveFn>),
}

impl NullspaceObjective {
    /// Wrap a closure as a custom objective.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Array1<f64>, &Array1<f64>, &Array2<f64>) -> f64 + Send + Sync + 'static,
    {
        NullspaceObjective::Custom(Arc::new(f))
    }

    pub fn name(&self) -> &'static str {
        match self {
            NullspaceObjective::SquaredLengths => "squared_lengths",
            NullspaceObjective::SummedLengths => "summed_lengths",
            NullspaceObjective::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for NullspaceObjective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NullspaceObjective::Custom(_) => f.write_str("Custom(<fn>)"),
            other => f.write_str(other.name()),
        }
    }
}

impl FromStr for NullspaceObjective {
    type Err = TransportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "squared_lengths" => Ok(NullspaceObjective::SquaredLengths),
            "summed_lengths" => Ok(NullspaceObjective::SummedLengths),
            _ => Err(TransportError::UnknownObjective { name: s.to_string() }),
        }
    }
}

/// First differences `x[i+1] − x[i]`; empty for fewer than two samples.
pub fn first_differences(x: &Array1<f64>) -> Array1<f64> {
    if x.len() < 2 {
        return Array1::zeros(0);
    }
    &x.slice(s![1..]) - &x.slice(s![..-1])
}

/// `Σ (x[i+1] − x[i])²`.
pub fn squared_lengths(x: &Array1<f64>) -> f64 {
    first_differences(x).mapv(|d| d * d).sum()
}

/// `Σ |x[i+1] − x[i]|`.
pub fn summed_lengths(x: &Array1<f64>) -> f64 {
    first_differences(x).mapv(f64::abs).sum()
}

/// Relative smoothing width of the summed-lengths stand-in.
pub const SUMMED_LENGTHS_SMOOTHING: f64 = 1e-4;

/// Smoothing width `ε` used when refining around `x_ls`.
pub fn summed_lengths_smoothing(x_ls: &Array1<f64>) -> f64 {
    let scale = x_ls.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    SUMMED_LENGTHS_SMOOTHING * if scale > 0.0 { scale } else { 1.0 }
}

/// `Σ sqrt((x[i+1] − x[i])² + ε²)`.
pub fn smoothed_summed_lengths(x: &Array1<f64>, smoothing: f64) -> f64 {
    first_differences(x).mapv(|d| d.hypot(smoothing)).sum()
}

/// Adjoint of the first-difference operator: `Dᵀ d` for a length-`n` signal.
fn difference_adjoint(d: &Array1<f64>, n: usize) -> Array1<f64> {
    let mut out = Array1::zeros(n);
    for (k, &dk) in d.iter().enumerate() {
        out[k + 1] += dk;
        out[k] -= dk;
    }
    out
}

#[derive(Clone, Copy)]
enum CostKind<'a> {
    SquaredLengths,
    SummedLengths { smoothing: f64 },
    Custom(&'a CustomObjectiveFn),
}

/// One optimization stage: a cost over nullspace weights `w`.
#[derive(Clone, Copy)]
pub struct NullspaceCost<'a> {
    kind: CostKind<'a>,
    x_ls: &'a Array1<f64>,
    basis: &'a Array2<f64>,
}

impl<'a> NullspaceCost<'a> {
    pub fn squared_lengths(x_ls: &'a Array1<f64>, basis: &'a Array2<f64>) -> Self {
        Self { kind: CostKind::SquaredLengths, x_ls, basis }
    }

    /// Smoothed summed lengths with `ε` from [`summed_lengths_smoothing`].
    pub fn summed_lengths(x_ls: &'a Array1<f64>, basis: &'a Array2<f64>) -> Self {
        let smoothing = summed_lengths_smoothing(x_ls);
        Self { kind: CostKind::SummedLengths { smoothing }, x_ls, basis }
    }

    pub fn custom(f: &'a CustomObjectiveFn, x_ls: &'a Array1<f64>, basis: &'a Array2<f64>) -> Self {
        Self { kind: CostKind::Custom(f), x_ls, basis }
    }

    pub fn stage(&self) -> OptimizationStage {
        match self.kind {
            CostKind::SquaredLengths => OptimizationStage::SquaredLengths,
            CostKind::SummedLengths { .. } => OptimizationStage::SummedLengths,
            CostKind::Custom(_) => OptimizationStage::Custom,
        }
    }

    /// The unsmoothed criterion at `w`, for stages that minimize a smoothed
    /// stand-in; `None` when the minimized value is already the criterion.
    pub fn exact_value(&self, w: &Array1<f64>) -> Option<f64> {
        match self.kind {
            CostKind::SummedLengths { .. } => Some(summed_lengths(&self.deposition(w))),
            CostKind::SquaredLengths | CostKind::Custom(_) => None,
        }
    }

    /// `x_ls + N · w`.
    pub fn deposition(&self, w: &Array1<f64>) -> Array1<f64> {
        self.x_ls + &self.basis.dot(w)
    }
}

impl Objective for NullspaceCost<'_> {
    type Data = ();

    fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
        Ok(match self.kind {
            CostKind::SquaredLengths => squared_lengths(&self.deposition(theta)),
            CostKind::SummedLengths { smoothing } => {
                smoothed_summed_lengths(&self.deposition(theta), smoothing)
            }
            CostKind::Custom(f) => f(theta, self.x_ls, self.basis),
        })
    }

    fn check(&self, theta: &Theta, _data: &()) -> OptResult<()> {
        validate_weights(theta, self.basis.ncols())
    }

    /// Analytic gradient through the chain rule `Nᵀ Dᵀ g(D x)`.
    ///
    /// - squared lengths: `g(d) = 2d`
    /// - summed lengths: `g(d) = d / sqrt(d² + ε²)`
    fn grad(&self, theta: &Theta, _data: &()) -> OptResult<Grad> {
        let d = first_differences(&self.deposition(theta));
        let outer = match self.kind {
            CostKind::SquaredLengths => d.mapv(|v| 2.0 * v),
            CostKind::SummedLengths { smoothing } => d.mapv(|v| v / v.hypot(smoothing)),
            CostKind::Custom(_) => return Err(OptError::GradientNotImplemented),
        };
        let through_x = difference_adjoint(&outer, self.x_ls.len());
        Ok(self.basis.t().dot(&through_x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Parsing of objective names.
    // - The smoothness measures on small vectors, including the bounds of
    //   the smoothed summed lengths.
    // - Analytic gradients against central finite differences.
    // - Custom objectives deferring to the finite-difference fallback.
    // -------------------------------------------------------------------------

    fn fd_grad(cost: &NullspaceCost<'_>, w: &Array1<f64>) -> Array1<f64> {
        let h = 1e-6;
        Array1::from_iter((0..w.len()).map(|k| {
            let mut up = w.clone();
            let mut down = w.clone();
            up[k] += h;
            down[k] -= h;
            (cost.value(&up, &()).unwrap() - cost.value(&down, &()).unwrap()) / (2.0 * h)
        }))
    }

    #[test]
    // Purpose
    // -------
    // Known names parse; anything else is `UnknownObjective`.
    fn from_str_accepts_known_names_only() {
        assert!(matches!(
            "squared_lengths".parse::<NullspaceObjective>(),
            Ok(NullspaceObjective::SquaredLengths)
        ));
        assert!(matches!(
            "summed_lengths".parse::<NullspaceObjective>(),
            Ok(NullspaceObjective::SummedLengths)
        ));
        assert!(matches!(
            "not_a_real_objective".parse::<NullspaceObjective>(),
            Err(TransportError::UnknownObjective { name }) if name == "not_a_real_objective"
        ));
    }

    #[test]
    // Purpose
    // -------
    // Smoothness measures on a small signal.
    fn smoothness_measures() {
        let x = array![1.0, 3.0, 2.0, 2.0];
        assert_eq!(first_differences(&x), array![2.0, -1.0, 0.0]);
        assert_eq!(squared_lengths(&x), 5.0);
        assert_eq!(summed_lengths(&x), 3.0);
        assert_eq!(squared_lengths(&array![4.0]), 0.0);
    }

    #[test]
    // Purpose
    // -------
    // The smoothed summed lengths stay within `(n − 1) ε` above the exact
    // value, and the stage reports the exact value.
    //
    // Given
    // -----
    // - `x_ls = [2, 2, -1, 3]` (ε = 1e-4 · 3), a zero basis column, so the
    //   deposition is `x_ls` for every weight.
    //
    // Expect
    // ------
    // - `Σ|d| ≤ value ≤ Σ|d| + 3ε`; `exact_value` equals `Σ|d| = 7`.
    // - The gradient contribution of the flat step `d = 0` vanishes.
    fn smoothed_summed_lengths_bounds_exact_value() {
        // Arrange
        let x_ls = array![2.0, 2.0, -1.0, 3.0];
        let basis = Array2::zeros((4, 1));
        let cost = NullspaceCost::summed_lengths(&x_ls, &basis);
        let eps = summed_lengths_smoothing(&x_ls);
        let w = array![0.0];

        // Act
        let smoothed = cost.value(&w, &()).unwrap();
        let exact = cost.exact_value(&w).unwrap();

        // Assert
        assert_abs_diff_eq!(eps, 3e-4, epsilon = 1e-15);
        assert_eq!(exact, 7.0);
        assert!(smoothed >= exact);
        assert!(smoothed <= exact + 3.0 * eps);
        assert_eq!(summed_lengths_smoothing(&Array1::zeros(3)), SUMMED_LENGTHS_SMOOTHING);
        assert!(NullspaceCost::squared_lengths(&x_ls, &basis).exact_value(&w).is_none());

        let flat = array![1.0, 1.0];
        let single = array![[1.0], [0.0]];
        let g = NullspaceCost::summed_lengths(&flat, &single).grad(&array![0.0], &()).unwrap();
        assert_abs_diff_eq!(g[0], 0.0, epsilon = 1e-15);
    }

    #[test]
    // Purpose
    // -------
    // Analytic gradients match finite differences away from kinks.
    //
    // Given
    // -----
    // - `x_ls = [1, 0, 2, 5]` and a 4 × 2 basis; weights chosen so no first
    //   difference is zero.
    //
    // Expect
    // ------
    // - Both built-in gradients agree with central differences to 1e-5.
    fn analytic_gradients_match_finite_differences() {
        // Arrange
        let x_ls = array![1.0, 0.0, 2.0, 5.0];
        let basis = array![[0.5, 0.1], [0.5, -0.3], [-0.5, 0.7], [-0.5, 0.2]];
        let w = array![0.3, -0.4];

        for cost in [
            NullspaceCost::squared_lengths(&x_ls, &basis),
            NullspaceCost::summed_lengths(&x_ls, &basis),
        ] {
            // Act
            let analytic = cost.grad(&w, &()).unwrap();
            let numeric = fd_grad(&cost, &w);

            // Assert
            for (a, n) in analytic.iter().zip(numeric.iter()) {
                assert_abs_diff_eq!(*a, *n, epsilon = 1e-5);
            }
        }
    }

    #[test]
    // Purpose
    // -------
    // Custom objectives receive `(w, x_ls, N)` and have no analytic gradient.
    fn custom_cost_forwards_arguments_and_defers_gradient() {
        let x_ls = array![1.0, 2.0];
        let basis = array![[1.0], [1.0]];
        let objective = NullspaceObjective::custom(|w, x_ls, n| {
            w.sum() + x_ls.sum() + n.sum()
        });
        let NullspaceObjective::Custom(f) = &objective else {
            panic!("expected custom objective")
        };
        let cost = NullspaceCost::custom(f.as_ref(), &x_ls, &basis);

        assert_eq!(cost.value(&array![0.5], &()).unwrap(), 5.5);
        assert_eq!(cost.grad(&array![0.5], &()), Err(OptError::GradientNotImplemented));
        assert_eq!(cost.stage(), OptimizationStage::Custom);
        assert!(cost.check(&array![0.0, 0.0], &()).is_err());
    }
}
