//! Coefficient builder: the linear operator from deposition to extraction
//! concentration.
//!
//! Purpose
//! -------
//! Discretize, for every extraction timestamp with a known residence time,
//! the window of days during which deposition on the catchment area ends up
//! in the extracted water. Row `r` of the resulting matrix, dotted with a
//! daily deposition vector, is the predicted concentration at the `r`-th
//! retained extraction timestamp.
//!
//! Key behaviors
//! -------------
//! - Extraction timestamps without a residence time are dropped, never
//!   zero-filled; the surviving rows keep flow order.
//! - The first day of each window is weighted by the part of that day still
//!   captured (`1 − f`, with `f` the fractional offset of the infiltration
//!   instant past its grid point); all later days up to the extraction day
//!   get weight 1.
//! - Rows are scaled by `catchment_area / max(flow, flow_floor)` where
//!   `flow_floor = median(flow) · flow_floor_fraction`, so near-zero flow
//!   never produces an arbitrarily large coefficient.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every coefficient is finite; otherwise assembly fails with
//!   [`TransportError::NonFiniteCoefficient`].
//! - The flow index is (close to) daily: fractional offsets are measured in
//!   days.
//! - Infiltration instants before the first flow timestamp are clamped to
//!   column 0 with zero offset.
//! - A row is all-zero only when the extraction flow is zero (its catchment
//!   area vanishes). It is kept so rows stay one-to-one with the valid
//!   timestamps; the concentration observed there does not constrain the
//!   deposition and is predicted as 0.
use crate::transport::{
    core::{AquiferParams, ResidenceTimeModel, TimeSeries, checked_residence_time, locate},
    errors::{TransportError, TransportResult},
};
use ndarray::{Array1, Array2};

/// One retained extraction timestamp and the quantities its matrix row is
/// built from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionRow {
    /// Extraction timestamp (days).
    pub extraction_time: f64,
    /// Position of the extraction timestamp in the flow index.
    pub flow_index: usize,
    /// Retarded residence time (days).
    pub residence_time: f64,
    /// `extraction_time − residence_time`.
    pub infiltration_time: f64,
    /// Flow at the extraction timestamp, before flooring.
    pub flow: f64,
    /// `flow / (R · porosity · thickness)`.
    pub catchment_area: f64,
}

/// Coefficient matrix plus the row table it was built from.
///
/// `matrix` has shape `(rows.len(), flow.len())`.
#[derive(Debug, Clone, PartialEq)]
pub struct DepositionCoefficients {
    pub rows: Vec<ExtractionRow>,
    pub matrix: Array2<f64>,
}

impl DepositionCoefficients {
    /// Extraction timestamps of the retained rows.
    pub fn valid_index(&self) -> Array1<f64> {
        self.rows.iter().map(|row| row.extraction_time).collect()
    }

    pub fn n_rows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n_columns(&self) -> usize {
        self.matrix.ncols()
    }
}

/// Build the deposition → concentration coefficient matrix.
///
/// # Errors
/// - Propagates residence-time model errors and contract violations.
/// - `TransportError::NoValidRows` if no extraction timestamp has a
///   residence time.
/// - `TransportError::InvalidFlowFloor` if `flow_floor_fraction` is not
///   finite and positive.
/// - `TransportError::NonFiniteCoefficient` for the first non-finite entry
///   after scaling.
pub fn build_coefficients<M: ResidenceTimeModel + ?Sized>(
    flow: &TimeSeries, aquifer: &AquiferParams, model: &M, flow_floor_fraction: f64,
) -> TransportResult<DepositionCoefficients> {
    if !flow_floor_fraction.is_finite() || flow_floor_fraction <= 0.0 {
        return Err(TransportError::InvalidFlowFloor { value: flow_floor_fraction });
    }
    let residence_time = checked_residence_time(
        model,
        flow,
        aquifer.pore_volume(),
        aquifer.retardation_factor(),
    )?;

    let index = flow.index();
    let values = flow.values();
    let rows: Vec<ExtractionRow> = residence_time
        .iter()
        .enumerate()
        .filter_map(|(i, rt)| {
            rt.map(|rt| ExtractionRow {
                extraction_time: index[i],
                flow_index: i,
                residence_time: rt,
                infiltration_time: index[i] - rt,
                flow: values[i],
                catchment_area: aquifer.catchment_area(values[i]),
            })
        })
        .collect();
    if rows.is_empty() {
        return Err(TransportError::NoValidRows);
    }

    let flow_floor = flow.median() * flow_floor_fraction;
    let mut matrix = Array2::<f64>::zeros((rows.len(), flow.len()));
    for (r, row) in rows.iter().enumerate() {
        let (first, offset) = match locate(index, row.infiltration_time) {
            Some(pos) => (pos.index, pos.offset),
            None => (0, 0.0),
        };
        let last = row.flow_index;
        let scale = row.catchment_area / row.flow.max(flow_floor);

        let mut coeffs = matrix.row_mut(r);
        for column in first..=last {
            let weight = if column == first { 1.0 - offset } else { 1.0 };
            let value = weight * scale;
            if !value.is_finite() {
                return Err(TransportError::NonFiniteCoefficient {
                    row: r,
                    extraction_time: row.extraction_time,
                    column,
                    value,
                });
            }
            coeffs[column] = value;
        }
    }

    let dry = rows.iter().filter(|row| row.catchment_area == 0.0).count();
    log::debug!(
        "coefficient matrix: {} rows x {} columns ({} extraction timestamps without residence time, {dry} zero-flow rows)",
        matrix.nrows(),
        matrix.ncols(),
        flow.len() - rows.len()
    );
    Ok(DepositionCoefficients { rows, matrix })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::core::AdvectiveResidenceTime;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array1, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Row windows and the partial first-day weight.
    // - Catchment scaling and the flow floor.
    // - Dropping rows without residence time, and the degenerate cases
    //   (no valid rows, non-finite coefficients, infiltration before the
    //   series start).
    // -------------------------------------------------------------------------

    fn unit_aquifer(pore_volume: f64) -> AquiferParams {
        AquiferParams::new(pore_volume, 1.0, 1.0, 1.0).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Constant flow gives equal-length windows of full-day weights.
    //
    // Given
    // -----
    // - Q = 100 for 6 days, V = 300, porosity 1, thickness 4, R = 1.
    //
    // Expect
    // ------
    // - Rows for days 3, 4, 5; each spans 4 columns with value
    //   (100 / 4) / 100 = 0.25.
    fn constant_flow_rows_span_residence_time_plus_one_day() {
        // Arrange
        let flow = TimeSeries::daily(0.0, Array1::from_elem(6, 100.0)).unwrap();
        let aquifer = AquiferParams::new(300.0, 1.0, 4.0, 1.0).unwrap();

        // Act
        let coeffs = build_coefficients(&flow, &aquifer, &AdvectiveResidenceTime, 0.01).unwrap();

        // Assert
        assert_eq!(coeffs.valid_index(), array![3.0, 4.0, 5.0]);
        assert_eq!(coeffs.matrix.dim(), (3, 6));
        let expected = array![
            [0.25, 0.25, 0.25, 0.25, 0.0, 0.0],
            [0.0, 0.25, 0.25, 0.25, 0.25, 0.0],
            [0.0, 0.0, 0.25, 0.25, 0.25, 0.25],
        ];
        for (a, e) in coeffs.matrix.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
        }
        let row = coeffs.rows[0];
        assert_eq!(row.flow_index, 3);
        assert_abs_diff_eq!(row.residence_time, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(row.catchment_area, 25.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // A fractional infiltration instant down-weights the first column.
    //
    // Given
    // -----
    // - Flow `[0, 100, 50, 200]`, V = 120 → infiltration at 0.3 (day 2) and
    //   2.4 (day 3); unit porosity, thickness and retardation so the row
    //   scale is 1.
    //
    // Expect
    // ------
    // - Rows `[0.7, 1, 1, 0]` and `[0, 0, 0.6, 1]`.
    fn fractional_infiltration_weights_first_column() {
        let flow = TimeSeries::daily(0.0, array![0.0, 100.0, 50.0, 200.0]).unwrap();

        let coeffs =
            build_coefficients(&flow, &unit_aquifer(120.0), &AdvectiveResidenceTime, 0.01).unwrap();

        let expected = array![[0.7, 1.0, 1.0, 0.0], [0.0, 0.0, 0.6, 1.0]];
        assert_eq!(coeffs.n_rows(), 2);
        for (a, e) in coeffs.matrix.iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*a, *e, epsilon = 1e-12);
        }
    }

    #[test]
    // Purpose
    // -------
    // The flow floor bounds the row scale for near-zero extraction flow.
    //
    // Given
    // -----
    // - Flow `[10, 10, 10, 0.001]` (median 10, floor 0.1) and a model
    //   returning a 1-day residence time only for the last day.
    //
    // Expect
    // ------
    // - Scale 0.001 / 0.1 = 0.01 on columns 2 and 3.
    fn flow_floor_bounds_row_scale() {
        let flow = TimeSeries::daily(0.0, array![10.0, 10.0, 10.0, 0.001]).unwrap();
        let model = |_: &TimeSeries, _: f64, _: f64| vec![None, None, None, Some(1.0)];

        let coeffs = build_coefficients(&flow, &unit_aquifer(1.0), &model, 0.01).unwrap();

        assert_eq!(coeffs.n_rows(), 1);
        let row = coeffs.matrix.row(0);
        assert_abs_diff_eq!(row[0], 0.0);
        assert_abs_diff_eq!(row[1], 0.0);
        assert_abs_diff_eq!(row[2], 0.01, epsilon = 1e-12);
        assert_abs_diff_eq!(row[3], 0.01, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Infiltration before the first timestamp is clamped to column 0.
    fn early_infiltration_clamps_to_first_column() {
        let flow = TimeSeries::daily(0.0, array![1.0, 1.0, 1.0]).unwrap();
        let model = |_: &TimeSeries, _: f64, _: f64| vec![None, None, Some(5.0)];

        let coeffs = build_coefficients(&flow, &unit_aquifer(1.0), &model, 0.01).unwrap();

        assert_eq!(coeffs.matrix.row(0).to_vec(), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    // Purpose
    // -------
    // Zero extraction flow gives an all-zero row that keeps its place among
    // the valid rows.
    //
    // Given
    // -----
    // - Flow `[10, 10, 0, 10]` (median 10) and a 1-day residence time from
    //   day 1 on.
    //
    // Expect
    // ------
    // - Three rows on days 1..=3; the day-2 row is all zero while its
    //   neighbours are not.
    fn zero_extraction_flow_gives_zero_row() {
        let flow = TimeSeries::daily(0.0, array![10.0, 10.0, 0.0, 10.0]).unwrap();
        let model = |_: &TimeSeries, _: f64, _: f64| vec![None, Some(1.0), Some(1.0), Some(1.0)];

        let coeffs = build_coefficients(&flow, &unit_aquifer(1.0), &model, 0.01).unwrap();

        assert_eq!(coeffs.valid_index(), array![1.0, 2.0, 3.0]);
        assert_eq!(coeffs.rows[1].catchment_area, 0.0);
        assert!(coeffs.matrix.row(1).iter().all(|&v| v == 0.0));
        assert!(coeffs.matrix.row(0).iter().any(|&v| v != 0.0));
        assert!(coeffs.matrix.row(2).iter().any(|&v| v != 0.0));
    }

    #[test]
    // Purpose
    // -------
    // Degenerate inputs are reported instead of producing a bad matrix.
    //
    // Given
    // -----
    // - A model with no residence times at all.
    // - All-zero flow, so the flow floor is zero and the row scale is 0/0.
    // - A non-positive flow-floor fraction.
    //
    // Expect
    // ------
    // - `NoValidRows`, `NonFiniteCoefficient` at row 0 / column 0, and
    //   `InvalidFlowFloor`.
    fn degenerate_inputs_are_rejected() {
        let flow = TimeSeries::daily(0.0, array![1.0, 1.0]).unwrap();
        let none = |_: &TimeSeries, _: f64, _: f64| vec![None, None];
        assert_eq!(
            build_coefficients(&flow, &unit_aquifer(1.0), &none, 0.01),
            Err(TransportError::NoValidRows)
        );

        let dry = TimeSeries::daily(0.0, array![0.0, 0.0]).unwrap();
        let instant = |_: &TimeSeries, _: f64, _: f64| vec![Some(0.0), Some(0.0)];
        assert!(matches!(
            build_coefficients(&dry, &unit_aquifer(1.0), &instant, 0.01),
            Err(TransportError::NonFiniteCoefficient { row: 0, column: 0, .. })
        ));

        assert_eq!(
            build_coefficients(&flow, &unit_aquifer(1.0), &instant, -1.0),
            Err(TransportError::InvalidFlowFloor { value: -1.0 })
        );
    }
}
