use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

/// Julian year in days
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Duration in days, the natural scale of Einstein timescales.
///
/// ```rust
/// use units::Time;
///
/// let einstein_crossing = Time::from_days(25.0);
/// let season = Time::from_years(0.5);
///
/// assert!(einstein_crossing / season < 0.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time(f64); // days

impl Time {
    pub fn from_days(value: f64) -> Self {
        Self(value)
    }

    pub fn from_years(value: f64) -> Self {
        Self(value * DAYS_PER_YEAR)
    }

    pub fn to_days(&self) -> f64 {
        self.0
    }

    pub fn to_years(&self) -> f64 {
        self.0 / DAYS_PER_YEAR
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

impl Mul<f64> for Time {
    type Output = Time;

    fn mul(self, factor: f64) -> Time {
        Time(self.0 * factor)
    }
}

impl Div for Time {
    type Output = f64;

    fn div(self, other: Time) -> f64 {
        self.0 / other.0
    }
}
