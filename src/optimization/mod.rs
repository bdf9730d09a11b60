//! optimization — L-BFGS minimizer and unified optimizer error surface.
//!
//! Purpose
//! -------
//! Provide the optimization layer used to pick a regularized member of a
//! solution family: callers implement a scalar objective over an
//! unconstrained weight vector, choose tolerances, and obtain the minimizer
//! together with diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **minimizing** objectives `c(w)`
//!   (`minimizer`), including configuration of solvers and stopping
//!   criteria.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Conventions
//! -----------
//! - Parameters and gradients are `ndarray` vectors (`Theta`, `Grad`).
//! - Public optimization entrypoints that can fail return `OptResult<T>`;
//!   callers never see raw Argmin errors.
//! - This module performs no I/O. Progress reporting is limited to the
//!   optional `obs_slog` observer and `log` diagnostics in the runner.

pub mod errors;
pub mod minimizer;

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::minimizer::prelude::*;
}
