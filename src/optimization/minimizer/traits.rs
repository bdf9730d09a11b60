//! Configuration and result types for the minimizer, and the trait an
//! objective implements to be minimized.
//!
//! The optimizer works on the cost `c(θ)` directly. An objective that can
//! differentiate itself returns `∇c(θ)` from [`Objective::grad`]; one that
//! cannot keeps the default, and the adapter switches to finite
//! differences.
use crate::optimization::{
    errors::{OptError, OptResult},
    minimizer::{
        Cost, EvalCounts, Grad, Theta,
        validation::{validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad},
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use argmin_math::ArgminL2Norm;
use std::str::FromStr;

/// A scalar cost over an unconstrained parameter vector.
///
/// `Data` is whatever the cost needs besides `θ`; it is borrowed for the
/// whole run. [`check`](Objective::check) runs once on the starting point
/// and should reject shapes the cost cannot handle.
pub trait Objective {
    type Data: 'static;

    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;

    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    /// Analytic gradient. The default signals that none exists.
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }
}

/// Line search driving each L-BFGS step.
///
/// Parses from `"MoreThuente"` / `"HagerZhang"` ignoring case, `-` and `_`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineSearcher {
    #[default]
    MoreThuente,
    HagerZhang,
}

impl FromStr for LineSearcher {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String =
            s.chars().filter(|c| !matches!(c, '-' | '_')).collect::<String>().to_lowercase();
        match key.as_str() {
            "morethuente" => Ok(LineSearcher::MoreThuente),
            "hagerzhang" => Ok(LineSearcher::HagerZhang),
            _ => Err(OptError::InvalidLineSearch { name: s.to_string() }),
        }
    }
}

/// Everything the minimizer needs besides the objective and starting point.
///
/// `verbose` only has an effect with the `obs_slog` feature, which then logs
/// the starting cost and attaches a terminal observer. `lbfgs_mem = None`
/// means [`DEFAULT_LBFGS_MEM`](crate::optimization::minimizer::DEFAULT_LBFGS_MEM).
/// The default uses [`Tolerances::default`] and More–Thuente.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OptimizerOptions {
    pub tols: Tolerances,
    pub line_searcher: LineSearcher,
    pub verbose: bool,
    pub lbfgs_mem: Option<usize>,
}

impl OptimizerOptions {
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] for a zero history length.
    pub fn new(
        tols: Tolerances, line_searcher: LineSearcher, verbose: bool, lbfgs_mem: Option<usize>,
    ) -> OptResult<Self> {
        match lbfgs_mem {
            Some(0) => Err(OptError::InvalidLBFGSMem { mem: 0 }),
            _ => Ok(Self { tols, line_searcher, verbose, lbfgs_mem }),
        }
    }
}

/// Stopping rules.
///
/// The solver stops when the gradient norm drops below `tol_grad`, when the
/// cost changes by less than `tol_cost` between iterations, or after
/// `max_iter` iterations, whichever comes first. Stopping on `max_iter` is
/// not convergence. The default is `1e-8`, `1e-12` and `2000`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] when no rule is given.
    /// - [`OptError::InvalidTolerance`] for a tolerance that is not finite
    ///   and positive.
    /// - [`OptError::InvalidMaxIter`] for a zero iteration cap.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if [tol_grad.is_none(), tol_cost.is_none(), max_iter.is_none()].iter().all(|&n| n) {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_grad(tol_grad)?;
        verify_tol_cost(tol_cost)?;
        if let Some(0) = max_iter {
            return Err(OptError::InvalidMaxIter { max_iter: 0 });
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_grad: Some(1e-8), tol_cost: Some(1e-12), max_iter: Some(2000) }
    }
}

/// What a minimization produced.
///
/// - `theta_hat`, `value`: best point seen and its cost.
/// - `converged`: `true` if the solver stopped on a convergence criterion
///   (gradient norm, cost change, or target cost). Hitting `max_iter`,
///   timeouts and interrupts are not convergence.
/// - `status`: argmin's termination reason, as text.
/// - `fn_evals`: argmin's evaluation counters.
/// - `grad_norm`: L2 norm of the last gradient, when the solver kept one.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: EvalCounts,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Condense argmin's final state.
    ///
    /// # Errors
    /// - [`OptError::MissingThetaHat`] / [`OptError::NonFiniteThetaHat`] for
    ///   an absent or non-finite best point.
    /// - [`OptError::NonFiniteCost`] for a non-finite best cost.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus, iterations: u64,
        fn_evals: EvalCounts, grad: Option<Grad>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let (converged, status) = match termination {
            TerminationStatus::NotTerminated => (false, "Not terminated".to_string()),
            TerminationStatus::Terminated(reason) => {
                let converged = matches!(
                    reason,
                    TerminationReason::SolverConverged | TerminationReason::TargetCostReached
                );
                (converged, format!("{reason:?}"))
            }
        };
        Ok(Self {
            theta_hat,
            value,
            converged,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm: grad.map(|g| g.l2_norm()),
        })
    }

    /// Outcome for a zero-dimensional problem, where there is nothing to
    /// optimize and the objective is evaluated once at the empty vector.
    pub fn trivial(value: f64) -> OptResult<Self> {
        validate_value(value)?;
        Ok(Self {
            theta_hat: Theta::zeros(0),
            value,
            converged: true,
            status: "No free parameters".to_string(),
            iterations: 0,
            fn_evals: EvalCounts::new(),
            grad_norm: None,
        })
    }

    /// Turn a non-converged outcome into [`OptError::NotConverged`].
    pub fn ensure_converged(self) -> OptResult<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(OptError::NotConverged { status: self.status, iterations: self.iterations })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction rules for `Tolerances` and `OptimizerOptions`.
    // - Case-insensitive parsing of `LineSearcher`.
    // - Mapping of argmin termination statuses onto `converged`.
    //
    // They intentionally DO NOT cover:
    // - Solver execution, which is tested in `api`.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `Tolerances::new` rejects an all-`None` configuration and a zero
    // iteration cap.
    //
    // Expect
    // ------
    // - `NoTolerancesProvided` and `InvalidMaxIter` respectively.
    fn tolerances_require_at_least_one_stopping_rule() {
        assert_eq!(Tolerances::new(None, None, None), Err(OptError::NoTolerancesProvided));
        assert!(matches!(
            Tolerances::new(Some(1e-6), None, Some(0)),
            Err(OptError::InvalidMaxIter { max_iter: 0 })
        ));
        assert!(Tolerances::new(None, None, Some(10)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // `OptimizerOptions::new` rejects a zero L-BFGS memory.
    fn optimizer_options_reject_zero_memory() {
        let tols = Tolerances::default();
        assert!(matches!(
            OptimizerOptions::new(tols, LineSearcher::HagerZhang, false, Some(0)),
            Err(OptError::InvalidLBFGSMem { mem: 0 })
        ));
        assert!(OptimizerOptions::new(tols, LineSearcher::HagerZhang, false, Some(5)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Line-search names parse case-insensitively; unknown names fail.
    fn line_searcher_parses_case_insensitively() {
        assert_eq!("morethuente".parse::<LineSearcher>().unwrap(), LineSearcher::MoreThuente);
        assert_eq!("HAGERZHANG".parse::<LineSearcher>().unwrap(), LineSearcher::HagerZhang);
        assert!(matches!(
            "backtracking".parse::<LineSearcher>(),
            Err(OptError::InvalidLineSearch { .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Only convergence-type termination reasons count as converged.
    //
    // Given
    // -----
    // - Outcomes built with `SolverConverged` and `MaxItersReached`.
    //
    // Expect
    // ------
    // - The first is converged, the second is not and `ensure_converged`
    //   returns `NotConverged`.
    fn outcome_distinguishes_convergence_from_iteration_cap() {
        let ok = OptimOutcome::new(
            Some(array![1.0]),
            0.5,
            TerminationStatus::Terminated(TerminationReason::SolverConverged),
            3,
            EvalCounts::new(),
            Some(array![0.0]),
        )
        .unwrap();
        assert!(ok.converged);
        assert_eq!(ok.grad_norm, Some(0.0));

        let capped = OptimOutcome::new(
            Some(array![1.0]),
            0.5,
            TerminationStatus::Terminated(TerminationReason::MaxItersReached),
            50,
            EvalCounts::new(),
            None,
        )
        .unwrap();
        assert!(!capped.converged);
        assert!(matches!(
            capped.ensure_converged(),
            Err(OptError::NotConverged { iterations: 50, .. })
        ));
    }
}
