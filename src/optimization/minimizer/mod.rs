//! minimizer — argmin-powered L-BFGS minimizer for nullspace objectives.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **minimizing**
//! scalar objectives `c(w)` over an unconstrained weight vector. Callers
//! implement a single trait, [`Objective`], and invoke [`minimize`] to run
//! L-BFGS with a configurable line search, tolerances, and finite-difference
//! fallbacks.
//!
//! Key behaviors
//! -------------
//! - Expose user objectives to Argmin as `CostFunction` / `Gradient` via
//!   [`adapter::ArgMinAdapter`].
//! - Expose a single, user-facing entrypoint [`minimize`] that:
//!   - validates the initial guess with [`Objective::check`],
//!   - selects an L-BFGS solver via [`builders`] based on [`traits::LineSearcher`],
//!   - executes the solver via [`run::run_lbfgs`], and
//!   - normalizes results into an [`OptimOutcome`].
//! - Fall back to finite-difference gradients (central, then forward) when
//!   an objective does not provide an analytic gradient.
//! - Centralize optimizer configuration ([`Tolerances`], [`OptimizerOptions`])
//!   and validation logic ([`validation`]) so downstream code can assume sane,
//!   finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`Objective::value`] and [`Objective::grad`] must treat invalid inputs
//!   as recoverable [`OptError`] values, not panics.
//! - Vectors use the canonical aliases [`Theta`] and [`Grad`]; both are
//!   assumed finite whenever optimization proceeds.
//! - A run that stops because it exhausted `max_iter` is reported as a
//!   failure ([`OptError::NotConverged`]), never as a usable estimate.
//!
//! Conventions
//! -----------
//! - Parameters live in an unconstrained space as [`Theta`]
//!   (`Array1<f64>`); for deposition inversion these are the weights of the
//!   nullspace basis columns.
//! - Errors bubble up as [`OptResult<T>`] / [`OptError`]; this module and its
//!   children never intentionally panic or use `unsafe`.
//!
//! Testing notes
//! -------------
//! - Unit tests in submodules cover gradient handling in [`adapter`], solver
//!   construction in [`builders`], validation helpers in [`validation`], and
//!   configuration invariants in [`traits`].
//! - [`api`] tests run full minimizations on small quadratic and
//!   finite-difference objectives.
//!
//! [`OptError`]: crate::optimization::errors::OptError
//! [`OptError::NotConverged`]: crate::optimization::errors::OptError::NotConverged
//! [`OptResult<T>`]: crate::optimization::errors::OptResult

pub mod adapter;
pub mod api;
pub mod builders;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{LineSearcher, Objective, OptimOutcome, OptimizerOptions, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, EvalCounts, Grad, Theta};

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{LineSearcher, Objective, OptimOutcome, OptimizerOptions, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
