//! Relative lens–source proper motion on the sky.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use units::ProperMotion;

/// Proper motion of a single star, in the (north, east) frame.
///
/// `east` is μ_α* (already multiplied by cos δ), `north` is μ_δ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkyMotion {
    pub north: ProperMotion,
    pub east: ProperMotion,
}

impl SkyMotion {
    pub fn new(north: ProperMotion, east: ProperMotion) -> Self {
        Self { north, east }
    }

    fn as_vector(&self) -> Vector2<f64> {
        Vector2::new(self.north.to_mas_per_year(), self.east.to_mas_per_year())
    }
}

/// Lens proper motion relative to the source, μ_rel = μ_L − μ_S.
///
/// Stored as a (north, east) vector in mas/yr.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeMotion(Vector2<f64>);

impl RelativeMotion {
    pub fn between(source: &SkyMotion, lens: &SkyMotion) -> Self {
        Self(lens.as_vector() - source.as_vector())
    }

    /// Magnitude |μ_L − μ_S|
    pub fn magnitude(&self) -> ProperMotion {
        ProperMotion::from_mas_per_year(self.0.norm())
    }

    /// Unit vector along the relative motion, or `None` when the motion vanishes.
    pub fn direction(&self) -> Option<Vector2<f64>> {
        self.0.try_normalize(f64::EPSILON)
    }

    pub fn north(&self) -> ProperMotion {
        ProperMotion::from_mas_per_year(self.0.x)
    }

    pub fn east(&self) -> ProperMotion {
        ProperMotion::from_mas_per_year(self.0.y)
    }
}

/// Unit (north, east) vector for a trajectory angle measured from north through east.
pub fn direction_from_angle(angle_rad: f64) -> Vector2<f64> {
    Vector2::new(angle_rad.cos(), angle_rad.sin())
}
