//! minimizer::builders — L-BFGS solver construction.
//!
//! Purpose
//! -------
//! Turn [`OptimizerOptions`] into a ready-to-run `argmin` L-BFGS solver for
//! either line search. History length and the two stopping tolerances are
//! applied here; the starting point and the iteration cap belong to the
//! executor and are set in [`run`](crate::optimization::minimizer::run).
//!
//! Conventions
//! -----------
//! - Tolerances left as `None` keep argmin's defaults.
//! - Rejections by argmin surface as [`OptError`](crate::optimization::errors::OptError)
//!   through `?`.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    errors::OptResult,
    minimizer::{
        traits::OptimizerOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLbfgs, HagerZhangSearch, MoreThuenteLbfgs,
            MoreThuenteSearch, Theta,
        },
    },
};

/// L-BFGS over `line_search` with the history length and tolerances in
/// `opts`.
///
/// # Errors
/// - Backend errors when argmin refuses a tolerance.
pub fn build_lbfgs<L>(
    line_search: L, opts: &OptimizerOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    let history = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let mut solver = LBFGS::new(line_search, history);
    if let Some(tol) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(tol)?;
    }
    if let Some(tol) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(tol)?;
    }
    Ok(solver)
}

pub fn more_thuente_lbfgs(opts: &OptimizerOptions) -> OptResult<MoreThuenteLbfgs> {
    build_lbfgs(MoreThuenteSearch::new(), opts)
}

pub fn hager_zhang_lbfgs(opts: &OptimizerOptions) -> OptResult<HagerZhangLbfgs> {
    build_lbfgs(HagerZhangSearch::new(), opts)
}
