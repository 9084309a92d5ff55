use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// M_J / M☉
pub const JUPITER_MASS_SOLAR: f64 = 9.547_919e-4;

/// M⊕ / M☉
pub const EARTH_MASS_SOLAR: f64 = 3.003_489e-6;

/// Lens mass, stored in solar masses.
///
/// Microlensing lenses run from free-floating planets near an Earth mass up
/// to stellar remnants of several M☉, so planetary units are provided for
/// readability at the low end.
///
/// ```rust
/// use units::Mass;
///
/// let host = Mass::from_solar_masses(0.3);
/// let planet = Mass::from_jupiter_masses(1.0);
/// assert!(planet / host < 0.01);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Mass(f64); // M☉

impl Mass {
    pub fn from_solar_masses(value: f64) -> Self {
        Self(value)
    }

    pub fn from_jupiter_masses(value: f64) -> Self {
        Self(value * JUPITER_MASS_SOLAR)
    }

    pub fn from_earth_masses(value: f64) -> Self {
        Self(value * EARTH_MASS_SOLAR)
    }

    pub fn to_solar_masses(&self) -> f64 {
        self.0
    }

    pub fn to_jupiter_masses(&self) -> f64 {
        self.0 / JUPITER_MASS_SOLAR
    }

    pub fn to_earth_masses(&self) -> f64 {
        self.0 / EARTH_MASS_SOLAR
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Mul<f64> for Mass {
    type Output = Mass;

    fn mul(self, factor: f64) -> Mass {
        Mass(self.0 * factor)
    }
}

/// Mass ratio, e.g. the binary-lens q
impl Div for Mass {
    type Output = f64;

    fn div(self, other: Mass) -> f64 {
        self.0 / other.0
    }
}
