use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

use crate::length::Length;
use crate::proper_motion::ProperMotion;
use crate::time::Time;

/// Milliarcseconds per radian (180/π × 3600 × 1000)
pub const MAS_PER_RADIAN: f64 = 206_264_806.247_096_36;

const MAS_PER_DEGREE: f64 = 3_600_000.0;

/// An angle on the sky using f64 precision.
///
/// Milliarcseconds are the base unit since Einstein angles, relative
/// parallaxes and source radii all live within a few orders of magnitude of 1 mas.
///
/// # Examples
///
/// ```rust
/// use units::{Angle, Length};
///
/// let theta_e = Angle::from_mas(0.55);
/// let radians = theta_e.to_radians();
///
/// // A solar radius seen from 8 kpc
/// let theta_star = Angle::subtended(Length::from_solar_radii(1.0), Length::from_kpc(8.0));
/// assert!(theta_star.to_mas() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Angle(f64); // Base unit: milliarcseconds

impl Angle {
    pub fn zero() -> Self {
        Self(0.0)
    }

    /// Creates a new `Angle` from a value in milliarcseconds.
    pub fn from_mas(value: f64) -> Self {
        Self(value)
    }

    /// Creates a new `Angle` from a value in arcseconds.
    pub fn from_arcsec(value: f64) -> Self {
        Self(value * 1000.0)
    }

    /// Creates a new `Angle` from a value in degrees.
    pub fn from_degrees(value: f64) -> Self {
        Self(value * MAS_PER_DEGREE)
    }

    /// Creates a new `Angle` from a value in radians.
    pub fn from_radians(value: f64) -> Self {
        Self(value * MAS_PER_RADIAN)
    }

    /// Small-angle size of an object of physical extent `size` at `distance`.
    pub fn subtended(size: Length, distance: Length) -> Self {
        Self::from_radians(size / distance)
    }

    /// Returns the angle in milliarcseconds.
    pub fn to_mas(&self) -> f64 {
        self.0
    }

    pub fn to_arcsec(&self) -> f64 {
        self.0 / 1000.0
    }

    pub fn to_degrees(&self) -> f64 {
        self.0 / MAS_PER_DEGREE
    }

    pub fn to_radians(&self) -> f64 {
        self.0 / MAS_PER_RADIAN
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Add for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;

    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Mul<f64> for Angle {
    type Output = Angle;

    fn mul(self, rhs: f64) -> Angle {
        Angle(self.0 * rhs)
    }
}

impl Div<f64> for Angle {
    type Output = Angle;

    fn div(self, rhs: f64) -> Angle {
        Angle(self.0 / rhs)
    }
}

/// Division of Angle by Angle returns a dimensionless ratio
impl Div for Angle {
    type Output = f64;

    fn div(self, rhs: Angle) -> f64 {
        self.0 / rhs.0
    }
}

/// Time needed to sweep an angle at a given proper motion
impl Div<ProperMotion> for Angle {
    type Output = Time;

    fn div(self, rhs: ProperMotion) -> Time {
        Time::from_years(self.0 / rhs.to_mas_per_year())
    }
}

/// Allow f64 * Angle (commutative multiplication)
impl Mul<Angle> for f64 {
    type Output = Angle;

    fn mul(self, rhs: Angle) -> Angle {
        rhs * self
    }
}
