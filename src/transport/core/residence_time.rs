//! Residence-time providers.
//!
//! Purpose
//! -------
//! Supply, for each extraction timestamp of a flow series, the (optionally
//! retarded) travel time of the water currently being extracted. The
//! coefficient builder only consumes this through [`ResidenceTimeModel`],
//! so callers can plug in their own travel-time model.
//!
//! Key behaviors
//! -------------
//! - [`AdvectiveResidenceTime`]: plug-flow travel time from cumulative
//!   extracted volume. Timestamps whose history cannot fill
//!   `retardation_factor · pore_volume` are `None`.
//! - Any `Fn(&TimeSeries, f64, f64) -> Vec<Option<f64>>` is a model too.
//! - [`checked_residence_time`] validates a model's output against the
//!   contract (aligned length, finite and non-negative values).
//!
//! Conventions
//! -----------
//! - Residence time is in days.
//! - Flow value `j` is the mean rate over `(index[j-1], index[j]]`; the first
//!   flow value therefore never contributes to the cumulative volume.
use crate::transport::{
    core::series::TimeSeries,
    errors::{TransportError, TransportResult},
};

/// Travel-time model consumed by the coefficient builder.
///
/// Implementations must be deterministic and side-effect free, and return
/// exactly one entry per flow sample.
pub trait ResidenceTimeModel {
    fn residence_time(
        &self, flow: &TimeSeries, pore_volume: f64, retardation_factor: f64,
    ) -> TransportResult<Vec<Option<f64>>>;
}

impl<F> ResidenceTimeModel for F
where
    F: Fn(&TimeSeries, f64, f64) -> Vec<Option<f64>>,
{
    fn residence_time(
        &self, flow: &TimeSeries, pore_volume: f64, retardation_factor: f64,
    ) -> TransportResult<Vec<Option<f64>>> {
        Ok(self(flow, pore_volume, retardation_factor))
    }
}

/// Plug-flow (advective) residence time from cumulative flow.
///
/// The cumulative extracted volume `V` is piecewise linear with
/// `V(index[0]) = 0` and `V(index[j]) = V(index[j-1]) + flow[j] · Δt_j`.
/// For an extraction at `index[i]` the infiltration instant `s` solves
/// `V(s) = V(index[i]) − R · pore_volume` by linear interpolation, and the
/// residence time is `index[i] − s`. With constant flow `Q` this is exactly
/// `R · pore_volume / Q`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdvectiveResidenceTime;

impl ResidenceTimeModel for AdvectiveResidenceTime {
    /// # Errors
    /// - `TransportError::NegativeFlow` for the first negative flow value.
    fn residence_time(
        &self, flow: &TimeSeries, pore_volume: f64, retardation_factor: f64,
    ) -> TransportResult<Vec<Option<f64>>> {
        let index = flow.index();
        let values = flow.values();
        if let Some((i, &v)) = values.iter().enumerate().find(|(_, v)| **v < 0.0) {
            return Err(TransportError::NegativeFlow { index: i, value: v });
        }

        let n = flow.len();
        let mut cumulative = Vec::with_capacity(n);
        cumulative.push(0.0);
        for j in 1..n {
            cumulative.push(cumulative[j - 1] + values[j] * (index[j] - index[j - 1]));
        }

        let required = retardation_factor * pore_volume;
        let out = (0..n)
            .map(|i| {
                let target = cumulative[i] - required;
                if target < 0.0 {
                    return None;
                }
                // Last sample whose cumulative volume does not exceed the target.
                let k = cumulative[..=i].partition_point(|&v| v <= target) - 1;
                let infiltration = if cumulative[k] == target || k == i {
                    index[k]
                } else {
                    index[k] + (target - cumulative[k]) / values[k + 1]
                };
                Some(index[i] - infiltration)
            })
            .collect();
        Ok(out)
    }
}

/// Run `model` and validate its output against the provider contract.
///
/// # Errors
/// - Propagates model errors.
/// - `TransportError::ResidenceTimeLengthMismatch` if the output is not
///   aligned to the flow index.
/// - `TransportError::InvalidResidenceTime` for the first negative or
///   non-finite value.
pub fn checked_residence_time<M: ResidenceTimeModel + ?Sized>(
    model: &M, flow: &TimeSeries, pore_volume: f64, retardation_factor: f64,
) -> TransportResult<Vec<Option<f64>>> {
    let rt = model.residence_time(flow, pore_volume, retardation_factor)?;
    if rt.len() != flow.len() {
        return Err(TransportError::ResidenceTimeLengthMismatch {
            expected: flow.len(),
            found: rt.len(),
        });
    }
    for (index, value) in rt.iter().enumerate() {
        if let Some(value) = *value {
            if !value.is_finite() || value < 0.0 {
                return Err(TransportError::InvalidResidenceTime { index, value });
            }
        }
    }
    Ok(rt)
}
