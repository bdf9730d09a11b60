//! core — shared series, aquifer, residence-time and grid primitives.
//!
//! Purpose
//! -------
//! Collect the building blocks the coefficient builder, inverter and
//! forward predictor share: validated time-series and aquifer containers,
//! the residence-time provider seam, timestamp-to-grid location, and run-time
//! options.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries`] validates index/value pairs once so downstream code can
//!   assume finite, strictly increasing timestamps.
//! - [`AquiferParams`] validates the physical parameters and computes the
//!   catchment area for a given extraction rate.
//! - [`ResidenceTimeModel`] is the only way residence time enters the
//!   system; [`AdvectiveResidenceTime`] is the default plug-flow model and
//!   [`checked_residence_time`] enforces the provider contract.
//! - [`locate`] maps a real-valued timestamp onto the flow grid.
//! - [`DepositionOptions`] and [`NullspaceTolerance`] carry the numerical
//!   knobs and their `Default` values.
//!
//! Invariants & assumptions
//! ------------------------
//! - Timestamps are `f64` days on a caller-chosen epoch and are expected to
//!   be (close to) daily; fractional days only appear as derived quantities.
//! - Everything here is immutable after construction and free of I/O.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; the first flow sample is the oldest.
//! - Errors are reported as [`TransportResult`] / [`TransportError`].
//!
//! [`TransportResult`]: crate::transport::errors::TransportResult
//! [`TransportError`]: crate::transport::errors::TransportError

pub mod aquifer;
pub mod grid;
pub mod options;
pub mod residence_time;
pub mod series;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::aquifer::AquiferParams;
pub use self::grid::{GridPosition, locate};
pub use self::options::{
    DEFAULT_FLOW_FLOOR_FRACTION, DEFAULT_NULLSPACE_ATOL, DepositionOptions, NullspaceTolerance,
};
pub use self::residence_time::{AdvectiveResidenceTime, ResidenceTimeModel, checked_residence_time};
pub use self::series::{TimeSeries, ensure_same_index};

pub mod prelude {
    pub use super::aquifer::AquiferParams;
    pub use super::options::{DepositionOptions, NullspaceTolerance};
    pub use super::residence_time::{AdvectiveResidenceTime, ResidenceTimeModel};
    pub use super::series::TimeSeries;
}
