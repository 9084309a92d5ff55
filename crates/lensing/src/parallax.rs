//! Microlensing parallax vector π_E = (π_rel / θ_E) · μ̂_rel.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use units::Angle;

use crate::error::{ensure_finite, LensingError};

/// North and east components of the microlensing parallax.
///
/// When parallax is not modelled both components are NaN. Zero is a valid
/// measured parallax and never stands in for "absent".
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MicrolensParallax {
    pub north: f64,
    pub east: f64,
}

impl MicrolensParallax {
    /// The "not modelled" sentinel.
    pub fn undefined() -> Self {
        Self {
            north: f64::NAN,
            east: f64::NAN,
        }
    }

    /// Project π_E = π_rel / θ_E along a unit direction.
    ///
    /// # Arguments
    /// * `pi_rel` - Relative parallax
    /// * `theta_e` - Einstein angle
    /// * `direction` - Unit (north, east) vector of the relative trajectory
    pub fn along(
        pi_rel: Angle,
        theta_e: Angle,
        direction: Vector2<f64>,
    ) -> Result<Self, LensingError> {
        let pi_e = ensure_finite("pi_E", pi_rel / theta_e)?;
        Ok(Self {
            north: ensure_finite("piEN", pi_e * direction.x)?,
            east: ensure_finite("piEE", pi_e * direction.y)?,
        })
    }

    pub fn is_modelled(&self) -> bool {
        !self.north.is_nan() && !self.east.is_nan()
    }

    /// Amplitude |π_E|; NaN when not modelled.
    pub fn magnitude(&self) -> f64 {
        self.north.hypot(self.east)
    }
}
