//! High-level entry point for minimizing a user-provided `Objective`.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the objective in an `ArgMinAdapter`, and delegates the run to
//! `run_lbfgs`.
use crate::optimization::{
    errors::OptResult,
    minimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{hager_zhang_lbfgs, more_thuente_lbfgs},
        run::run_lbfgs,
        traits::{LineSearcher, Objective, OptimizerOptions},
    },
};

/// Minimize an objective `c(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - A zero-length `theta0` has nothing to optimize: the objective is
///   evaluated once and returned as a converged outcome without invoking
///   the solver.
/// - Otherwise builds an L-BFGS solver with **Hager–Zhang** or
///   **More–Thuente** line search based on `opts.line_searcher` and runs it
///   through `run_lbfgs`.
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - Propagates builder errors from the solver builders.
/// - Propagates runtime errors from `run_lbfgs` (e.g., line search failures).
///
/// # Returns
/// An [`OptimOutcome`] containing `theta_hat`, best value `c(θ̂)`,
/// termination status, iteration counts, function evaluation counts, and
/// optionally the gradient norm. Convergence is reported, not enforced.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use rust_gwtransport::optimization::{
///     errors::OptResult,
///     minimizer::{Cost, Objective, OptimizerOptions, Theta, minimize},
/// };
///
/// struct Bowl;
/// impl Objective for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<Cost> {
///         Ok(theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = minimize(&Bowl, array![0.1, -0.2, 0.3], &(), &OptimizerOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), rust_gwtransport::optimization::errors::OptError>(())
/// ```
pub fn minimize<F: Objective>(
    f: &F, theta0: Theta, data: &F::Data, opts: &OptimizerOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    if theta0.is_empty() {
        return OptimOutcome::trivial(f.value(&theta0, data)?);
    }
    let problem = ArgMinAdapter::new(f, data);
    match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = more_thuente_lbfgs(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = hager_zhang_lbfgs(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }
}
