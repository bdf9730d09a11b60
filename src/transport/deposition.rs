//! Deposition inverter: observed extraction concentration → deposition.
//!
//! Purpose
//! -------
//! Recover the daily deposition history that explains an observed
//! concentration series. The coefficient matrix has more columns (days of
//! deposition) than rows (extraction days with a residence time), so the
//! inversion is composed of two explicit stages:
//!
//! 1. [`particular_solution`]: the minimum-norm least-squares solution
//!    `x_ls`.
//! 2. [`refine_in_nullspace`]: weights `w*` for the nullspace basis `N`
//!    minimizing the chosen [`NullspaceObjective`], so that
//!    `x = x_ls + N w*` fits the data exactly as well as `x_ls` does.
//!
//! Key behaviors
//! -------------
//! - The squared-lengths stage always runs first (from `w = 0`, analytic
//!   gradient). Summed-lengths and custom objectives are then minimized
//!   from the squared-lengths weights; summed lengths through its smoothed
//!   stand-in, with the stage reporting the exact `Σ |Δx|`.
//! - A zero-dimensional nullspace skips optimization entirely; the result
//!   is `x_ls`.
//! - An optimizer stage that errors or stops without converging is a
//!   [`TransportError::OptimizationFailed`] naming the stage.
//! - The concentration length is checked against the number of valid rows
//!   before any numerical work.
//!
//! Downstream usage
//! ----------------
//! - [`compute_deposition`] is the one-call entry point with the advective
//!   residence-time model; [`invert`] / [`invert_series`] accept any
//!   [`ResidenceTimeModel`] and return every intermediate stage in a
//!   [`DepositionFit`].
use crate::{
    optimization::minimizer::{OptimOutcome, OptimizerOptions, Theta, minimize},
    transport::{
        coefficients::{DepositionCoefficients, build_coefficients},
        core::{
            AdvectiveResidenceTime, AquiferParams, DepositionOptions, ResidenceTimeModel,
            TimeSeries, ensure_same_index,
        },
        errors::{OptimizationStage, TransportError, TransportResult},
        nullspace::{least_squares, nullspace},
        objective::{NullspaceCost, NullspaceObjective},
    },
};
use ndarray::{Array1, Array2};

/// Outcome of one nullspace optimization stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageOutcome {
    pub stage: OptimizationStage,
    pub outcome: OptimOutcome,
}

/// Every stage of a deposition inversion.
///
/// Fields
/// ------
/// - `coefficients`: matrix and row table the fit was computed against.
/// - `particular`: minimum-norm least-squares solution `x_ls`.
/// - `basis`: nullspace basis `N`, shape `(n_days, nullity)`.
/// - `weights`: optimal nullspace weights `w*` (empty when nullity is 0).
/// - `deposition`: `x_ls + N w*` on the flow index.
/// - `stages`: optimizer diagnostics, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositionFit {
    pub coefficients: DepositionCoefficients,
    pub particular: Array1<f64>,
    pub basis: Array2<f64>,
    pub weights: Array1<f64>,
    pub deposition: TimeSeries,
    pub stages: Vec<StageOutcome>,
}

impl DepositionFit {
    pub fn nullity(&self) -> usize {
        self.basis.ncols()
    }

    /// Concentration predicted by the fitted deposition on the valid rows.
    pub fn predicted(&self) -> Array1<f64> {
        self.coefficients.matrix.dot(self.deposition.values())
    }
}

/// Minimum-norm least-squares deposition for `cout`.
///
/// # Errors
/// - `TransportError::ConcentrationLengthMismatch` if `cout` does not have
///   one value per valid row.
/// - `TransportError::NonFiniteData` / `LinearAlgebra` from the solve.
pub fn particular_solution(
    coefficients: &DepositionCoefficients, cout: &Array1<f64>,
) -> TransportResult<Array1<f64>> {
    ensure_row_count(coefficients, cout.len())?;
    least_squares(&coefficients.matrix, cout)
}

/// Optimal weights for `basis` under `objective`, with the stage outcomes.
///
/// With an empty basis nothing is optimized and the weights are empty.
///
/// # Errors
/// - `TransportError::OptimizationFailed` for the first stage that fails or
///   does not converge.
pub fn refine_in_nullspace(
    x_ls: &Array1<f64>, basis: &Array2<f64>, objective: &NullspaceObjective,
    optimizer: &OptimizerOptions,
) -> TransportResult<(Array1<f64>, Vec<StageOutcome>)> {
    if basis.ncols() == 0 {
        log::debug!("nullity 0: least-squares solution is unique");
        return Ok((Array1::zeros(0), Vec::new()));
    }

    let squared = NullspaceCost::squared_lengths(x_ls, basis);
    let warm = run_stage(&squared, Array1::zeros(basis.ncols()), optimizer)?;
    let second = match objective {
        NullspaceObjective::SquaredLengths => None,
        NullspaceObjective::SummedLengths => {
            let summed = NullspaceCost::summed_lengths(x_ls, basis);
            Some(run_stage(&summed, warm.outcome.theta_hat.clone(), optimizer)?)
        }
        NullspaceObjective::Custom(f) => {
            let custom = NullspaceCost::custom(f.as_ref(), x_ls, basis);
            Some(run_stage(&custom, warm.outcome.theta_hat.clone(), optimizer)?)
        }
    };

    let mut stages = vec![warm];
    stages.extend(second);
    let weights = stages.last().map(|s| s.outcome.theta_hat.clone()).unwrap_or_default();
    Ok((weights, stages))
}

fn run_stage(
    cost: &NullspaceCost<'_>, w0: Theta, optimizer: &OptimizerOptions,
) -> TransportResult<StageOutcome> {
    let stage = cost.stage();
    let mut outcome = minimize(cost, w0, &(), optimizer)
        .and_then(OptimOutcome::ensure_converged)
        .map_err(|err| TransportError::optimization(stage, err))?;
    if let Some(exact) = cost.exact_value(&outcome.theta_hat) {
        outcome.value = exact;
    }
    log::debug!(
        "{stage} stage: cost {:.6e} after {} iterations ({})",
        outcome.value,
        outcome.iterations,
        outcome.status
    );
    Ok(StageOutcome { stage, outcome })
}

/// Full inversion of a plain concentration vector (one value per valid
/// row, in flow order).
///
/// # Errors
/// - Coefficient-assembly errors (see [`build_coefficients`]).
/// - `TransportError::ConcentrationLengthMismatch` before any solve.
/// - Linear-algebra and optimization errors from the two stages.
pub fn invert<M: ResidenceTimeModel + ?Sized>(
    cout: &Array1<f64>, flow: &TimeSeries, aquifer: &AquiferParams, model: &M,
    objective: &NullspaceObjective, options: &DepositionOptions,
) -> TransportResult<DepositionFit> {
    let coefficients = build_coefficients(flow, aquifer, model, options.flow_floor_fraction)?;
    solve(coefficients, cout, flow, objective, options)
}

/// Full inversion of an indexed concentration series.
///
/// Same as [`invert`], and additionally requires `cout`'s index to equal
/// the extraction timestamps of the valid rows.
///
/// # Errors
/// - As [`invert`], plus `TransportError::IndexMismatch` for a misaligned
///   index (checked after the length).
pub fn invert_series<M: ResidenceTimeModel + ?Sized>(
    cout: &TimeSeries, flow: &TimeSeries, aquifer: &AquiferParams, model: &M,
    objective: &NullspaceObjective, options: &DepositionOptions,
) -> TransportResult<DepositionFit> {
    let coefficients = build_coefficients(flow, aquifer, model, options.flow_floor_fraction)?;
    ensure_row_count(&coefficients, cout.len())?;
    ensure_same_index(&coefficients.valid_index(), cout.index())?;
    solve(coefficients, cout.values(), flow, objective, options)
}

/// Deposition on the flow index using the advective residence time.
///
/// # Errors
/// As [`invert`].
pub fn compute_deposition(
    cout: &Array1<f64>, flow: &TimeSeries, aquifer: &AquiferParams,
    objective: &NullspaceObjective, options: &DepositionOptions,
) -> TransportResult<TimeSeries> {
    invert(cout, flow, aquifer, &AdvectiveResidenceTime, objective, options)
        .map(|fit| fit.deposition)
}

fn solve(
    coefficients: DepositionCoefficients, cout: &Array1<f64>, flow: &TimeSeries,
    objective: &NullspaceObjective, options: &DepositionOptions,
) -> TransportResult<DepositionFit> {
    let particular = particular_solution(&coefficients, cout)?;
    let basis = nullspace(&coefficients.matrix, options.nullspace_tol)?;
    let (weights, stages) = refine_in_nullspace(&particular, &basis, objective, &options.optimizer)?;

    let values = if weights.is_empty() { particular.clone() } else { &particular + &basis.dot(&weights) };
    let deposition = TimeSeries::new(flow.index().clone(), values)?;
    Ok(DepositionFit { coefficients, particular, basis, weights, deposition, stages })
}

fn ensure_row_count(coefficients: &DepositionCoefficients, found: usize) -> TransportResult<()> {
    let expected = coefficients.n_rows();
    if found != expected {
        return Err(TransportError::ConcentrationLengthMismatch { expected, found });
    }
    Ok(())
}
