use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul, Sub};

/// AU per parsec (648000/π)
pub const AU_PER_PARSEC: f64 = 206_264.806_247_096_36;

/// 1 R☉ = 0.00465047 AU
pub const SOLAR_RADIUS_AU: f64 = 1.0 / 215.032;

/// Distance or physical size, stored in AU.
///
/// Microlensing mixes AU-scale quantities (the relative parallax baseline, lens
/// semi-major axes) with kiloparsec distances, so both ends are first-class here.
///
/// ```rust
/// use units::Length;
///
/// let lens = Length::from_parsecs(4000.0);
/// let source = Length::from_distance_modulus(14.5);
///
/// assert!(lens < source);
/// assert!(source.to_kpc() > 7.9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Length(f64); // AU

impl Length {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_au(value: f64) -> Self {
        Self(value)
    }

    pub fn from_parsecs(value: f64) -> Self {
        Self(value * AU_PER_PARSEC)
    }

    pub fn from_kpc(value: f64) -> Self {
        Self::from_parsecs(value * 1000.0)
    }

    /// Distance from a distance modulus μ = m − M, D = 10^((μ + 5) / 5) pc.
    ///
    /// Extinction is not modelled.
    ///
    /// ```rust
    /// use units::Length;
    ///
    /// let ten_pc = Length::from_distance_modulus(0.0);
    /// assert!((ten_pc.to_parsecs() - 10.0).abs() < 1e-9);
    /// ```
    pub fn from_distance_modulus(mu: f64) -> Self {
        Self::from_parsecs(10f64.powf((mu + 5.0) / 5.0))
    }

    pub fn from_solar_radii(value: f64) -> Self {
        Self(value * SOLAR_RADIUS_AU)
    }

    pub fn to_au(&self) -> f64 {
        self.0
    }

    pub fn to_parsecs(&self) -> f64 {
        self.0 / AU_PER_PARSEC
    }

    pub fn to_kpc(&self) -> f64 {
        self.to_parsecs() / 1000.0
    }

    /// Inverse of [`Length::from_distance_modulus`].
    pub fn to_distance_modulus(&self) -> f64 {
        5.0 * self.to_parsecs().log10() - 5.0
    }

    pub fn to_solar_radii(&self) -> f64 {
        self.0 / SOLAR_RADIUS_AU
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, other: Length) -> Length {
        Length(self.0 - other.0)
    }
}

impl Mul<f64> for Length {
    type Output = Length;

    fn mul(self, factor: f64) -> Length {
        Length(self.0 * factor)
    }
}

/// Size over distance; the small-angle subtended angle in radians
impl Div for Length {
    type Output = f64;

    fn div(self, other: Length) -> f64 {
        self.0 / other.0
    }
}
