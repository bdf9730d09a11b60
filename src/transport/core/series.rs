//! Time-series container shared by flow, concentration and deposition.
//!
//! Purpose
//! -------
//! Provide a small, validated container pairing a timestamp index with one
//! value per timestamp. All series handled by the inversion are batch,
//! fixed-length and passed by value.
//!
//! Invariants & assumptions
//! ------------------------
//! - The index is non-empty, finite and **strictly increasing**.
//! - Values are finite and have the same length as the index.
//! - Timestamps are expressed in **days** on an epoch chosen by the caller
//!   (e.g. days since 1970-01-01). The inversion assumes daily granularity;
//!   fractional-day offsets only appear as derived quantities.
//!
//! Conventions
//! -----------
//! - Two series are *aligned* when their indices are equal element-wise,
//!   checked with [`TimeSeries::ensure_aligned`].
//! - A flow value at position `j` is the mean rate over the interval ending
//!   at `index[j]`.
use crate::transport::errors::{TransportError, TransportResult};
use ndarray::Array1;

/// `TimeSeries` — validated (timestamp, value) pairs.
///
/// Fields
/// ------
/// - `index`: `Array1<f64>`
///   Timestamps in days; finite, strictly increasing.
/// - `values`: `Array1<f64>`
///   One finite value per timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    index: Array1<f64>,
    values: Array1<f64>,
}

impl TimeSeries {
    /// Construct a validated series.
    ///
    /// # Errors
    /// - `TransportError::EmptySeries` if the index is empty.
    /// - `TransportError::LengthMismatch` if lengths differ.
    /// - `TransportError::NonFiniteData` for the first NaN/±∞ timestamp or value.
    /// - `TransportError::NonIncreasingIndex` if timestamps are not strictly
    ///   increasing.
    pub fn new(index: Array1<f64>, values: Array1<f64>) -> TransportResult<Self> {
        if index.is_empty() {
            return Err(TransportError::EmptySeries);
        }
        if index.len() != values.len() {
            return Err(TransportError::LengthMismatch {
                expected: index.len(),
                found: values.len(),
            });
        }
        for (i, (&t, &v)) in index.iter().zip(values.iter()).enumerate() {
            if !t.is_finite() {
                return Err(TransportError::NonFiniteData { index: i, value: t });
            }
            if !v.is_finite() {
                return Err(TransportError::NonFiniteData { index: i, value: v });
            }
            if i > 0 && t <= index[i - 1] {
                return Err(TransportError::NonIncreasingIndex {
                    index: i,
                    previous: index[i - 1],
                    current: t,
                });
            }
        }
        Ok(TimeSeries { index, values })
    }

    /// Build a daily series starting at day `start`.
    ///
    /// # Errors
    /// Same as [`TimeSeries::new`].
    pub fn daily(start: f64, values: Array1<f64>) -> TransportResult<Self> {
        let index = Array1::from_iter((0..values.len()).map(|i| start + i as f64));
        Self::new(index, values)
    }

    pub fn index(&self) -> &Array1<f64> {
        &self.index
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Always `false` for a constructed series; kept for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Consume the series, returning `(index, values)`.
    pub fn into_parts(self) -> (Array1<f64>, Array1<f64>) {
        (self.index, self.values)
    }

    /// Median of the values (mean of the two middle values for even length).
    pub fn median(&self) -> f64 {
        let mut sorted = self.values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let n = sorted.len();
        if n % 2 == 1 { sorted[n / 2] } else { 0.5 * (sorted[n / 2 - 1] + sorted[n / 2]) }
    }

    /// Check that `other_index` equals this series' index element-wise.
    ///
    /// # Errors
    /// - `TransportError::LengthMismatch` if lengths differ.
    /// - `TransportError::IndexMismatch` at the first differing position.
    pub fn ensure_aligned(&self, other_index: &Array1<f64>) -> TransportResult<()> {
        ensure_same_index(&self.index, other_index)
    }
}

/// Element-wise equality check between two timestamp indices.
///
/// # Errors
/// - `TransportError::LengthMismatch` if lengths differ.
/// - `TransportError::IndexMismatch` at the first differing position.
pub fn ensure_same_index(expected: &Array1<f64>, found: &Array1<f64>) -> TransportResult<()> {
    if expected.len() != found.len() {
        return Err(TransportError::LengthMismatch { expected: expected.len(), found: found.len() });
    }
    for (position, (&e, &f)) in expected.iter().zip(found.iter()).enumerate() {
        if e != f {
            return Err(TransportError::IndexMismatch { position, expected: e, found: f });
        }
    }
    Ok(())
}
