//! Forward predictor: deposition history → extraction concentration.
//!
//! Uses the same coefficient matrix as the inverter, so predicting from an
//! inverted deposition reproduces the observations it was fitted to. An
//! inversion run with a non-default flow floor must be predicted with
//! [`compute_concentration_with_floor`] and the same fraction.
use crate::transport::{
    coefficients::{DepositionCoefficients, build_coefficients},
    core::{AquiferParams, DEFAULT_FLOW_FLOOR_FRACTION, ResidenceTimeModel, TimeSeries},
    errors::{TransportError, TransportResult},
};
use ndarray::Array1;

/// `matrix · deposition` for an already assembled operator.
///
/// # Errors
/// - `TransportError::LengthMismatch` if `deposition` does not have one
///   value per matrix column.
pub fn predict(
    coefficients: &DepositionCoefficients, deposition: &Array1<f64>,
) -> TransportResult<Array1<f64>> {
    if deposition.len() != coefficients.n_columns() {
        return Err(TransportError::LengthMismatch {
            expected: coefficients.n_columns(),
            found: deposition.len(),
        });
    }
    Ok(coefficients.matrix.dot(deposition))
}

/// Concentration at every extraction timestamp with a residence time,
/// indexed by those timestamps, using [`DEFAULT_FLOW_FLOOR_FRACTION`].
///
/// # Errors
/// - `TransportError::LengthMismatch` / `IndexMismatch` if `deposition` is
///   not aligned to `flow`.
/// - Coefficient-assembly errors (see [`build_coefficients`]).
pub fn compute_concentration<M: ResidenceTimeModel + ?Sized>(
    deposition: &TimeSeries, flow: &TimeSeries, aquifer: &AquiferParams, model: &M,
) -> TransportResult<TimeSeries> {
    compute_concentration_with_floor(
        deposition,
        flow,
        aquifer,
        model,
        DEFAULT_FLOW_FLOOR_FRACTION,
    )
}

/// [`compute_concentration`] with an explicit flow-floor fraction, matching
/// `DepositionOptions::flow_floor_fraction` of the inversion.
///
/// # Errors
/// As [`compute_concentration`], plus `TransportError::InvalidFlowFloor`.
pub fn compute_concentration_with_floor<M: ResidenceTimeModel + ?Sized>(
    deposition: &TimeSeries, flow: &TimeSeries, aquifer: &AquiferParams, model: &M,
    flow_floor_fraction: f64,
) -> TransportResult<TimeSeries> {
    flow.ensure_aligned(deposition.index())?;
    let coefficients = build_coefficients(flow, aquifer, model, flow_floor_fraction)?;
    let cout = predict(&coefficients, deposition.values())?;
    TimeSeries::new(coefficients.valid_index(), cout)
}
