//! Aquifer transport parameters.
//!
//! Parameters are inputs, never fitted: pore volume, porosity, thickness
//! and the compound's retardation factor.
use crate::transport::errors::{TransportError, TransportResult};

/// `AquiferParams` — validated, immutable aquifer description.
///
/// Fields
/// ------
/// - `pore_volume`: `f64` — volume of water in the aquifer [volume]; > 0.
/// - `porosity`: `f64` — dimensionless, in (0, 1].
/// - `thickness`: `f64` — saturated thickness [length]; > 0.
/// - `retardation_factor`: `f64` — dimensionless, ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AquiferParams {
    pore_volume: f64,
    porosity: f64,
    thickness: f64,
    retardation_factor: f64,
}

impl AquiferParams {
    /// Construct validated aquifer parameters.
    ///
    /// # Errors
    /// - `InvalidPoreVolume`, `InvalidPorosity`, `InvalidThickness`,
    ///   `InvalidRetardationFactor` for the first parameter outside its
    ///   domain (non-finite values are always rejected).
    pub fn new(
        pore_volume: f64, porosity: f64, thickness: f64, retardation_factor: f64,
    ) -> TransportResult<Self> {
        if !pore_volume.is_finite() || pore_volume <= 0.0 {
            return Err(TransportError::InvalidPoreVolume { value: pore_volume });
        }
        if !porosity.is_finite() || porosity <= 0.0 || porosity > 1.0 {
            return Err(TransportError::InvalidPorosity { value: porosity });
        }
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(TransportError::InvalidThickness { value: thickness });
        }
        if !retardation_factor.is_finite() || retardation_factor < 1.0 {
            return Err(TransportError::InvalidRetardationFactor { value: retardation_factor });
        }
        Ok(AquiferParams { pore_volume, porosity, thickness, retardation_factor })
    }

    pub fn pore_volume(&self) -> f64 {
        self.pore_volume
    }

    pub fn porosity(&self) -> f64 {
        self.porosity
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn retardation_factor(&self) -> f64 {
        self.retardation_factor
    }

    /// Catchment area contributing to an extraction at rate `flow`:
    /// `flow / (R · porosity · thickness)`.
    pub fn catchment_area(&self, flow: f64) -> f64 {
        flow / (self.retardation_factor * self.porosity * self.thickness)
    }
}
