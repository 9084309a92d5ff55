//! Binary-lens separation in Einstein units.

use units::{Angle, Length};

use crate::error::{ensure_finite, LensingError};

/// Projects a physical separation at the lens distance onto the sky and
/// scales it by the Einstein angle.
///
/// s = (a / D_L) / θ_E. With `a` in AU and D_L in pc the projected angle is
/// `a / D_L` arcsec.
pub fn angular_separation(
    semi_major_axis: Length,
    lens_distance: Length,
    theta_e: Angle,
) -> Result<f64, LensingError> {
    let projected = Angle::subtended(semi_major_axis, lens_distance);
    ensure_finite("s", projected / theta_e)
}

/// Physical Einstein radius R_E = θ_E · D_L.
pub fn einstein_radius(theta_e: Angle, lens_distance: Length) -> Length {
    lens_distance * theta_e.to_radians()
}
