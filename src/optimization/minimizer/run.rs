//! Executes a configured L-BFGS solver and condenses argmin's final state
//! into an [`OptimOutcome`].
use argmin::core::{Executor, IterState, Solver, State};

use crate::optimization::{
    errors::OptResult,
    minimizer::{Grad, Objective, OptimOutcome, OptimizerOptions, Theta, adapter::ArgMinAdapter},
};

type LbfgsState = IterState<Theta, Grad, (), (), (), f64>;

/// Run `solver` on `problem` from `theta0`.
///
/// The iteration cap from `opts` is applied to the executor. With the
/// `obs_slog` feature and `opts.verbose`, the starting cost is logged and
/// a terminal observer reports every iteration.
///
/// A run that stops without converging still returns its outcome; use
/// [`OptimOutcome::ensure_converged`] to reject it.
///
/// # Errors
/// - argmin runtime failures, including errors raised by the objective.
/// - A missing or non-finite best parameter, or a non-finite best cost.
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &OptimizerOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: Objective,
    S: Solver<ArgMinAdapter<'a, F>, LbfgsState> + Send + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        report_start(&problem, &theta0)?;
    }

    let max_iter = opts.tols.max_iter;
    let executor = Executor::new(problem, solver).configure(|state| {
        let state = state.param(theta0);
        match max_iter {
            Some(cap) => state.max_iters(cap as u64),
            None => state,
        }
    });

    #[cfg(feature = "obs_slog")]
    let executor = if opts.verbose {
        executor.add_observer(
            argmin_observer_slog::SlogLogger::term_noblock(),
            argmin::core::observers::ObserverMode::Always,
        )
    } else {
        executor
    };

    let result = executor.run()?;
    let mut state = result.state().clone();
    let termination = state.get_termination_status().clone();
    log::trace!("L-BFGS stopped after {} iterations: {termination:?}", state.get_iter());

    OptimOutcome::new(
        state.take_best_param(),
        state.get_best_cost(),
        termination,
        state.get_iter(),
        state.get_func_counts().clone(),
        state.take_gradient(),
    )
}

/// Print the starting cost and gradient norm to stderr, the stream the slog
/// terminal drain writes iteration records to.
#[cfg(feature = "obs_slog")]
fn report_start<F: Objective>(problem: &ArgMinAdapter<'_, F>, theta0: &Theta) -> OptResult<()> {
    eprintln!("{}", start_message(problem, theta0)?);
    Ok(())
}

#[cfg_attr(not(feature = "obs_slog"), allow(dead_code))]
fn start_message<F: Objective>(problem: &ArgMinAdapter<'_, F>, theta0: &Theta) -> OptResult<String> {
    use argmin::core::{CostFunction, Gradient};
    use argmin_math::ArgminL2Norm;

    let cost = problem.cost(theta0)?;
    let grad_norm = problem.gradient(theta0).ok().map(|g| g.l2_norm());
    Ok(format!(
        "init: cost(theta0) = {cost:.6}{}",
        grad_norm.map(|n| format!(", ||grad|| = {n:.6}")).unwrap_or_default()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::minimizer::Cost;
    use ndarray::array;

    /// `c(θ) = Σ (θ_i − 1)²`.
    struct Bowl;

    impl Objective for Bowl {
        type Data = ();

        fn value(&self, theta: &Theta, _data: &()) -> OptResult<Cost> {
            Ok(theta.iter().map(|t| (t - 1.0).powi(2)).sum())
        }

        fn check(&self, _theta: &Theta, _data: &()) -> OptResult<()> {
            Ok(())
        }

        fn grad(&self, theta: &Theta, _data: &()) -> OptResult<Grad> {
            Ok(theta.mapv(|t| 2.0 * (t - 1.0)))
        }
    }

    #[test]
    // Purpose
    // -------
    // The verbose start line carries the starting cost and gradient norm.
    //
    // Given
    // -----
    // θ₀ = [3, 1] on the unit bowl: cost 4, gradient [4, 0].
    //
    // Expect
    // ------
    // "init: cost(theta0) = 4.000000, ||grad|| = 4.000000".
    fn start_message_reports_cost_and_gradient_norm() {
        // Arrange
        let problem = ArgMinAdapter::new(&Bowl, &());

        // Act
        let msg = start_message(&problem, &array![3.0, 1.0]).unwrap();

        // Assert
        assert_eq!(msg, "init: cost(theta0) = 4.000000, ||grad|| = 4.000000");
    }
}
