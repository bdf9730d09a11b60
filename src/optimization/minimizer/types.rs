//! minimizer::types — numeric aliases shared by the minimizer.
//!
//! Weights, gradients and costs are plain `ndarray`/`f64` values; the
//! aliases below pin the generic parameters of the `argmin` line searches
//! and the L-BFGS solver to them once, so the builders and the runner can
//! name concrete solver types.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::Array1;
use std::collections::HashMap;

/// Point in parameter space (for deposition inversion: nullspace weights).
pub type Theta = Array1<f64>;

/// Gradient of the cost at a [`Theta`]; same length.
pub type Grad = Array1<f64>;

pub type Cost = f64;

/// Evaluation counters keyed by argmin's names (`"cost_count"`,
/// `"gradient_count"`).
pub type EvalCounts = HashMap<String, u64>;

/// History length used when the caller does not choose one.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type MoreThuenteSearch = MoreThuenteLineSearch<Theta, Grad, Cost>;
pub type HagerZhangSearch = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLbfgs = LBFGS<MoreThuenteSearch, Theta, Grad, Cost>;
pub type HagerZhangLbfgs = LBFGS<HagerZhangSearch, Theta, Grad, Cost>;
