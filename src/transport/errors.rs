//! Errors for deposition inversion (input validation, residence-time
//! contract checks, coefficient assembly, linear algebra and optimizer
//! failures).
//!
//! This module defines [`TransportError`], used across the Rust core and,
//! with the `python-bindings` feature, converted to `ValueError` at the PyO3
//! boundary.
//!
//! ## Conventions
//! - **Indices are 0-based**.
//! - Timestamps are reported in days on the caller's epoch.
//! - Optimizer/backend errors are normalized to
//!   [`TransportError::OptimizationFailed`] with the stage that failed and
//!   the optimizer's own message.
use crate::optimization::errors::OptError;

/// Result alias for deposition-inversion operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Which optimization stage of the nullspace refinement failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationStage {
    /// Warm-start minimization of squared first differences.
    SquaredLengths,
    /// Minimization of summed absolute first differences.
    SummedLengths,
    /// Minimization of a caller-supplied objective.
    Custom,
}

impl std::fmt::Display for OptimizationStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptimizationStage::SquaredLengths => write!(f, "squared_lengths"),
            OptimizationStage::SummedLengths => write!(f, "summed_lengths"),
            OptimizationStage::Custom => write!(f, "custom"),
        }
    }
}

/// Unified error type for deposition inversion.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    // ---- Input/data validation ----
    /// Series is empty.
    EmptySeries,

    /// Index and values have different lengths.
    LengthMismatch { expected: usize, found: usize },

    /// A timestamp or value is NaN/±inf.
    NonFiniteData { index: usize, value: f64 },

    /// Timestamps must be strictly increasing.
    NonIncreasingIndex { index: usize, previous: f64, current: f64 },

    /// Two series that must share an index do not.
    IndexMismatch { position: usize, expected: f64, found: f64 },

    // ---- Aquifer parameters / options ----
    /// Pore volume must be finite and > 0.
    InvalidPoreVolume { value: f64 },

    /// Porosity must lie in (0, 1].
    InvalidPorosity { value: f64 },

    /// Thickness must be finite and > 0.
    InvalidThickness { value: f64 },

    /// Retardation factor must be finite and ≥ 1.
    InvalidRetardationFactor { value: f64 },

    /// Flow-floor fraction must be finite and > 0.
    InvalidFlowFloor { value: f64 },

    /// Nullspace tolerances must be finite and ≥ 0.
    InvalidNullspaceTolerance { atol: f64, rtol: f64 },

    // ---- Residence time ----
    /// Residence-time model returned a series of the wrong length.
    ResidenceTimeLengthMismatch { expected: usize, found: usize },

    /// Advective travel time needs non-negative flow.
    NegativeFlow { index: usize, value: f64 },

    /// Residence-time model returned a negative or non-finite value.
    InvalidResidenceTime { index: usize, value: f64 },

    /// No extraction timestamp has a determinable residence time.
    NoValidRows,

    // ---- Inversion ----
    /// Observed concentration length differs from the number of valid rows.
    ConcentrationLengthMismatch { expected: usize, found: usize },

    /// A coefficient is non-finite after scaling.
    NonFiniteCoefficient { row: usize, extraction_time: f64, column: usize, value: f64 },

    /// Linear algebra backend failure (SVD solve).
    LinearAlgebra { reason: String },

    /// Objective name is not recognized.
    UnknownObjective { name: String },

    /// Nullspace optimization failed or did not converge.
    OptimizationFailed { stage: OptimizationStage, status: String },
}

impl std::error::Error for TransportError {}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Input/data validation ----
            TransportError::EmptySeries => {
                write!(f, "Input series is empty.")
            }
            TransportError::LengthMismatch { expected, found } => {
                write!(f, "Series length mismatch: expected {expected}, found {found}")
            }
            TransportError::NonFiniteData { index, value } => {
                write!(f, "Data point at index {index} is non-finite: {value}")
            }
            TransportError::NonIncreasingIndex { index, previous, current } => {
                write!(
                    f,
                    "Index must be strictly increasing; at position {index} got {current} after {previous}"
                )
            }
            TransportError::IndexMismatch { position, expected, found } => {
                write!(
                    f,
                    "Series are not aligned: at position {position} expected timestamp {expected}, found {found}"
                )
            }

            // ---- Aquifer parameters / options ----
            TransportError::InvalidPoreVolume { value } => {
                write!(f, "Pore volume must be finite and > 0; got: {value}")
            }
            TransportError::InvalidPorosity { value } => {
                write!(f, "Porosity must lie in (0, 1]; got: {value}")
            }
            TransportError::InvalidThickness { value } => {
                write!(f, "Thickness must be finite and > 0; got: {value}")
            }
            TransportError::InvalidRetardationFactor { value } => {
                write!(f, "Retardation factor must be finite and >= 1; got: {value}")
            }
            TransportError::InvalidFlowFloor { value } => {
                write!(f, "Flow-floor fraction must be finite and > 0; got: {value}")
            }
            TransportError::InvalidNullspaceTolerance { atol, rtol } => {
                write!(f, "Nullspace tolerances must be finite and >= 0; got atol={atol}, rtol={rtol}")
            }

            // ---- Residence time ----
            TransportError::ResidenceTimeLengthMismatch { expected, found } => {
                write!(
                    f,
                    "Residence-time series has length {found}, expected {expected} (one per flow sample)"
                )
            }
            TransportError::NegativeFlow { index, value } => {
                write!(f, "Flow at index {index} is negative: {value}")
            }
            TransportError::InvalidResidenceTime { index, value } => {
                write!(f, "Residence time at index {index} must be finite and >= 0; got: {value}")
            }
            TransportError::NoValidRows => {
                write!(
                    f,
                    "No extraction timestamp has a determinable residence time; the flow series is too short to fill the pore volume"
                )
            }

            // ---- Inversion ----
            TransportError::ConcentrationLengthMismatch { expected, found } => {
                write!(
                    f,
                    "Length of cout ({found}) should be equal to the number of rows in the coefficient matrix ({expected})"
                )
            }
            TransportError::NonFiniteCoefficient { row, extraction_time, column, value } => {
                write!(
                    f,
                    "Coefficient at row {row} (extraction at {extraction_time}), column {column} is non-finite: {value}"
                )
            }
            TransportError::LinearAlgebra { reason } => {
                write!(f, "Linear algebra failure: {reason}")
            }
            TransportError::UnknownObjective { name } => {
                write!(
                    f,
                    "Unknown nullspace objective: '{name}'. Valid options are 'squared_lengths' or 'summed_lengths'."
                )
            }
            TransportError::OptimizationFailed { stage, status } => {
                write!(f, "Optimization failed ({stage}): {status}")
            }
        }
    }
}

impl TransportError {
    /// Wrap an optimizer error raised during `stage`.
    pub fn optimization(stage: OptimizationStage, err: OptError) -> Self {
        TransportError::OptimizationFailed { stage, status: err.to_string() }
    }
}

/// Convert a [`TransportError`] into a Python `ValueError` with the error
/// message.
#[cfg(feature = "python-bindings")]
impl std::convert::From<TransportError> for pyo3::PyErr {
    fn from(err: TransportError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
