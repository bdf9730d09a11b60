//! Errors raised while configuring or running the minimizer.
//!
//! Variants fall into four groups: configuration (rejected before a solver
//! is built), evaluation (objective values, gradients, weight vectors),
//! outcome (the solver's final state) and backend (anything `argmin`
//! reports). Errors produced by our own objectives travel through `argmin`
//! boxed and are recovered unchanged by `From<argmin::core::Error>`.
use argmin::core::{ArgminError, Error};

/// Result alias for optimizer operations.
pub type OptResult<T> = Result<T, OptError>;

/// Which stopping tolerance was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceKind {
    Gradient,
    CostChange,
}

/// Category of an error reported by the `argmin` backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    InvalidParameter,
    NotImplemented,
    NotInitialized,
    ConditionViolated,
    CheckpointNotFound,
    PotentialBug,
    ImpossibleError,
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Configuration ----
    /// Stopping tolerances must be finite and > 0.
    InvalidTolerance { kind: ToleranceKind, value: f64 },

    /// `max_iter` must be > 0.
    InvalidMaxIter { max_iter: usize },

    /// All of `tol_grad`, `tol_cost` and `max_iter` were `None`.
    NoTolerancesProvided,

    /// Line-search name not recognized.
    InvalidLineSearch { name: String },

    /// L-BFGS history must hold at least one pair.
    InvalidLBFGSMem { mem: usize },

    // ---- Evaluation ----
    /// The objective has no analytic gradient; finite differences apply.
    GradientNotImplemented,

    GradientDimMismatch { expected: usize, found: usize },

    NonFiniteGradient { index: usize, value: f64 },

    NonFiniteCost { value: f64 },

    /// Weight vector length differs from the number of basis columns.
    WeightLengthMismatch { expected: usize, found: usize },

    /// Weight entries must be finite.
    InvalidWeight { index: usize, value: f64 },

    // ---- Outcome ----
    /// The solver's best parameter vector has a non-finite entry.
    NonFiniteThetaHat { index: usize, value: f64 },

    /// The solver finished without a best parameter vector.
    MissingThetaHat,

    /// Solver stopped without meeting any convergence criterion.
    NotConverged { status: String, iterations: usize },

    // ---- Backend ----
    Backend { kind: BackendErrorKind, text: String },
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptError::InvalidTolerance { kind, value } => {
                let which = match kind {
                    ToleranceKind::Gradient => "gradient",
                    ToleranceKind::CostChange => "cost-change",
                };
                write!(f, "The {which} tolerance must be finite and > 0; got {value}")
            }
            OptError::InvalidMaxIter { max_iter } => {
                write!(f, "max_iter must be > 0; got {max_iter}")
            }
            OptError::NoTolerancesProvided => {
                write!(f, "At least one of tol_grad, tol_cost or max_iter must be set")
            }
            OptError::InvalidLineSearch { name } => {
                write!(f, "Unknown line search '{name}'; expected 'MoreThuente' or 'HagerZhang'")
            }
            OptError::InvalidLBFGSMem { mem } => {
                write!(f, "L-BFGS memory must be > 0; got {mem}")
            }
            OptError::GradientNotImplemented => {
                write!(f, "Objective provides no analytic gradient")
            }
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient has length {found}, expected {expected}")
            }
            OptError::NonFiniteGradient { index, value } => {
                write!(f, "Gradient entry {index} is non-finite: {value}")
            }
            OptError::NonFiniteCost { value } => {
                write!(f, "Objective returned a non-finite value: {value}")
            }
            OptError::WeightLengthMismatch { expected, found } => {
                write!(f, "Weight vector has length {found}, expected {expected}")
            }
            OptError::InvalidWeight { index, value } => {
                write!(f, "Weight {index} is non-finite: {value}")
            }
            OptError::NonFiniteThetaHat { index, value } => {
                write!(f, "Optimizer returned a non-finite estimate at index {index}: {value}")
            }
            OptError::MissingThetaHat => {
                write!(f, "Optimizer returned no estimate")
            }
            OptError::NotConverged { status, iterations } => {
                write!(f, "Solver did not converge after {iterations} iterations: {status}")
            }
            OptError::Backend { kind, text } => {
                write!(f, "argmin error ({kind:?}): {text}")
            }
        }
    }
}

impl From<Error> for OptError {
    fn from(err: Error) -> Self {
        let err = match err.downcast::<OptError>() {
            Ok(ours) => return ours,
            Err(err) => err,
        };
        match err.downcast::<ArgminError>() {
            Ok(argmin_err) => {
                let kind = match &argmin_err {
                    ArgminError::InvalidParameter { .. } => BackendErrorKind::InvalidParameter,
                    ArgminError::NotImplemented { .. } => BackendErrorKind::NotImplemented,
                    ArgminError::NotInitialized { .. } => BackendErrorKind::NotInitialized,
                    ArgminError::ConditionViolated { .. } => BackendErrorKind::ConditionViolated,
                    ArgminError::CheckpointNotFound { .. } => BackendErrorKind::CheckpointNotFound,
                    ArgminError::PotentialBug { .. } => BackendErrorKind::PotentialBug,
                    ArgminError::ImpossibleError { .. } => BackendErrorKind::ImpossibleError,
                    _ => BackendErrorKind::Other,
                };
                OptError::Backend { kind, text: argmin_err.to_string() }
            }
            Err(other) => OptError::Backend { kind: BackendErrorKind::Other, text: other.to_string() },
        }
    }
}

/// Convert an [`OptError`] into a Python `ValueError` with the error message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<OptError> for pyo3::PyErr {
    fn from(err: OptError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
