//! Run-time options for deposition inversion.
//!
//! Purpose
//! -------
//! Bundle the knobs that are not aquifer physics: the nullspace
//! zero-singular-value tolerance, the flow floor used to stabilise the
//! coefficient scaling, and the optimizer configuration for the nullspace
//! refinement.
//!
//! Conventions
//! -----------
//! - Constructors validate their inputs and return `TransportResult`.
//! - `Default` impls: `atol = 1e-13`,
//!   `rtol = 0`, flow floor = median(flow) / 100.
use crate::{
    optimization::minimizer::OptimizerOptions,
    transport::errors::{TransportError, TransportResult},
};

/// Default absolute tolerance for treating a singular value as zero.
pub const DEFAULT_NULLSPACE_ATOL: f64 = 1e-13;

/// Default flow floor as a fraction of the median flow.
pub const DEFAULT_FLOW_FLOOR_FRACTION: f64 = 0.01;

/// Zero-singular-value tolerance: `tol = max(atol, rtol · s_max)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NullspaceTolerance {
    pub atol: f64,
    pub rtol: f64,
}

impl NullspaceTolerance {
    /// # Errors
    /// - `TransportError::InvalidNullspaceTolerance` if either value is
    ///   negative or non-finite.
    pub fn new(atol: f64, rtol: f64) -> TransportResult<Self> {
        if !atol.is_finite() || !rtol.is_finite() || atol < 0.0 || rtol < 0.0 {
            return Err(TransportError::InvalidNullspaceTolerance { atol, rtol });
        }
        Ok(Self { atol, rtol })
    }

    /// Effective threshold given the largest singular value.
    pub fn threshold(&self, s_max: f64) -> f64 {
        self.atol.max(self.rtol * s_max)
    }
}

impl Default for NullspaceTolerance {
    fn default() -> Self {
        Self { atol: DEFAULT_NULLSPACE_ATOL, rtol: 0.0 }
    }
}

/// `DepositionOptions` — configuration for coefficient assembly and inversion.
///
/// Fields
/// ------
/// - `optimizer`: [`OptimizerOptions`] used by every nullspace stage.
/// - `nullspace_tol`: [`NullspaceTolerance`] for the SVD nullspace.
/// - `flow_floor_fraction`: `f64` — the flow used to scale coefficient rows
///   is clipped below at `median(flow) · flow_floor_fraction`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositionOptions {
    pub optimizer: OptimizerOptions,
    pub nullspace_tol: NullspaceTolerance,
    pub flow_floor_fraction: f64,
}

impl DepositionOptions {
    /// # Errors
    /// - `TransportError::InvalidFlowFloor` if `flow_floor_fraction` is not
    ///   finite and strictly positive.
    pub fn new(
        optimizer: OptimizerOptions, nullspace_tol: NullspaceTolerance, flow_floor_fraction: f64,
    ) -> TransportResult<Self> {
        if !flow_floor_fraction.is_finite() || flow_floor_fraction <= 0.0 {
            return Err(TransportError::InvalidFlowFloor { value: flow_floor_fraction });
        }
        Ok(Self { optimizer, nullspace_tol, flow_floor_fraction })
    }
}

impl Default for DepositionOptions {
    fn default() -> Self {
        Self {
            optimizer: OptimizerOptions::default(),
            nullspace_tol: NullspaceTolerance::default(),
            flow_floor_fraction: DEFAULT_FLOW_FLOOR_FRACTION,
        }
    }
}
