use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul};

use crate::angle::Angle;
use crate::time::{Time, DAYS_PER_YEAR};

/// Angular rate on the sky in milliarcseconds per Julian year.
///
/// # Examples
///
/// ```rust
/// use units::{ProperMotion, Time};
///
/// let mu_rel = ProperMotion::from_mas_per_year(5.0);
/// let swept = mu_rel * Time::from_years(2.0);
/// assert_eq!(swept.to_mas(), 10.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Deserialize, Serialize)]
#[serde(transparent)]
pub struct ProperMotion(f64); // Base unit: mas/yr

impl ProperMotion {
    pub fn zero() -> Self {
        Self(0.0)
    }

    pub fn from_mas_per_year(value: f64) -> Self {
        Self(value)
    }

    pub fn from_mas_per_day(value: f64) -> Self {
        Self(value * DAYS_PER_YEAR)
    }

    pub fn to_mas_per_year(&self) -> f64 {
        self.0
    }

    pub fn to_mas_per_day(&self) -> f64 {
        self.0 / DAYS_PER_YEAR
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite()
    }
}

/// Angle swept over an interval
impl Mul<Time> for ProperMotion {
    type Output = Angle;

    fn mul(self, rhs: Time) -> Angle {
        Angle::from_mas(self.0 * rhs.to_years())
    }
}

impl Mul<f64> for ProperMotion {
    type Output = ProperMotion;

    fn mul(self, rhs: f64) -> ProperMotion {
        ProperMotion(self.0 * rhs)
    }
}

impl Div<f64> for ProperMotion {
    type Output = ProperMotion;

    fn div(self, rhs: f64) -> ProperMotion {
        ProperMotion(self.0 / rhs)
    }
}
