//! transport — deposition inversion for 1-D advective aquifer transport.
//!
//! Purpose
//! -------
//! Estimate the unobserved daily deposition of a compound onto an aquifer
//! from the concentration observed in extracted water, given the extraction
//! flow and known aquifer properties, and predict concentrations forward
//! from a deposition history.
//!
//! Key behaviors
//! -------------
//! - [`core`]: validated series and aquifer containers, the
//!   [`ResidenceTimeModel`] seam with the default advective model, the grid
//!   locator, and run-time options.
//! - [`coefficients`]: the linear operator mapping deposition to extraction
//!   concentration.
//! - [`nullspace`]: SVD nullspace basis and minimum-norm least squares.
//! - [`objective`]: smoothness criteria used to pick a member of the
//!   exact-solution family.
//! - [`deposition`]: the two-stage inverter.
//! - [`forward`]: the forward predictor.
//!
//! Invariants & assumptions
//! ------------------------
//! - Flow, deposition and (indexed) concentration series share a daily
//!   timestamp grid; coefficient rows exist only for extraction timestamps
//!   with a residence time.
//! - Everything is batch and synchronous; values are computed fresh per
//!   call and no state is shared.
//!
//! Conventions
//! -----------
//! - Units are the caller's: flow [volume/day], pore volume [volume],
//!   thickness [length], concentration [mass/volume], deposition
//!   [mass/area/day]. No conversions happen here.
//! - Failures are [`TransportError`] values; optimizer failures carry the
//!   stage that failed.
//!
//! Downstream usage
//! ----------------
//! 1. Build a flow [`TimeSeries`] and [`AquiferParams`].
//! 2. Call [`compute_deposition`] with the observed concentration on the
//!    valid rows (or [`invert`] for a custom residence-time model and full
//!    diagnostics).
//! 3. Feed a deposition history to [`compute_concentration`] to predict.
//!
//! Testing notes
//! -------------
//! - Unit tests live next to each submodule; end-to-end scenarios are in
//!   `tests/integration_deposition_pipeline.rs`.

pub mod coefficients;
pub mod core;
pub mod deposition;
pub mod errors;
pub mod forward;
pub mod nullspace;
pub mod objective;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::coefficients::{DepositionCoefficients, ExtractionRow, build_coefficients};
pub use self::core::{
    AdvectiveResidenceTime, AquiferParams, DepositionOptions, NullspaceTolerance,
    ResidenceTimeModel, TimeSeries,
};
pub use self::deposition::{
    DepositionFit, StageOutcome, compute_deposition, invert, invert_series, particular_solution,
    refine_in_nullspace,
};
pub use self::errors::{OptimizationStage, TransportError, TransportResult};
pub use self::forward::{compute_concentration, compute_concentration_with_floor, predict};
pub use self::nullspace::{least_squares, nullspace};
pub use self::objective::{CustomObjectiveFn, NullspaceObjective};

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::deposition::{DepositionFit, compute_deposition, invert};
    pub use super::errors::{TransportError, TransportResult};
    pub use super::forward::compute_concentration;
    pub use super::objective::NullspaceObjective;
}
