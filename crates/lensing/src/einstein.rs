//! Einstein-ring relations between lens mass, distances, and event timescale.
//!
//! All relations use the point-lens convention
//! θ_E² = κ · M · π_rel with κ = 4G / (c² AU) ≈ 8.144 mas M☉⁻¹.

use units::{Angle, Length, Mass, ProperMotion, Time};

use crate::error::{ensure_finite, LensingError};

/// κ = 4G / (c² AU) in mas per solar mass
pub const KAPPA_MAS_PER_SOLAR_MASS: f64 = 8.144;

/// Relative proper motions below this (mas/yr) make tE ↔ θ_E ill-conditioned
pub const MIN_RELATIVE_PROPER_MOTION_MAS_YR: f64 = 1.0e-3;

/// Relative parallax π_rel = 1 AU / D_L − 1 AU / D_S.
///
/// # Example
/// ```
/// use lensing::einstein::relative_parallax;
/// use units::Length;
///
/// let pi_rel = relative_parallax(Length::from_parsecs(4000.0), Length::from_parsecs(8000.0));
/// assert!((pi_rel.to_mas() - 0.125).abs() < 1e-12);
/// ```
pub fn relative_parallax(lens_distance: Length, source_distance: Length) -> Angle {
    let one_au = Length::from_au(1.0);
    Angle::subtended(one_au, lens_distance) - Angle::subtended(one_au, source_distance)
}

fn checked_relative_parallax(
    lens_distance: Length,
    source_distance: Length,
) -> Result<Angle, LensingError> {
    let pi_rel = relative_parallax(lens_distance, source_distance);
    ensure_finite("pi_rel", pi_rel.to_mas())?;
    if pi_rel.to_mas() <= 0.0 {
        return Err(LensingError::degenerate(format!(
            "lens at {:.1} pc is not in front of source at {:.1} pc",
            lens_distance.to_parsecs(),
            source_distance.to_parsecs()
        )));
    }
    Ok(pi_rel)
}

fn checked_proper_motion(mu_rel: ProperMotion) -> Result<ProperMotion, LensingError> {
    ensure_finite("mu_rel", mu_rel.to_mas_per_year())?;
    if mu_rel.to_mas_per_year() < MIN_RELATIVE_PROPER_MOTION_MAS_YR {
        return Err(LensingError::degenerate(format!(
            "relative proper motion {:.2e} mas/yr is below the {:.0e} mas/yr floor",
            mu_rel.to_mas_per_year(),
            MIN_RELATIVE_PROPER_MOTION_MAS_YR
        )));
    }
    Ok(mu_rel)
}

/// Angular Einstein radius of a point lens.
///
/// # Arguments
/// * `mass` - Lens mass
/// * `lens_distance` - Observer–lens distance D_L
/// * `source_distance` - Observer–source distance D_S (must exceed D_L)
pub fn einstein_angle(
    mass: Mass,
    lens_distance: Length,
    source_distance: Length,
) -> Result<Angle, LensingError> {
    let m = ensure_finite("lens_mass_solar", mass.to_solar_masses())?;
    if m <= 0.0 {
        return Err(LensingError::degenerate(format!(
            "lens mass {m} M☉ is not positive"
        )));
    }
    let pi_rel = checked_relative_parallax(lens_distance, source_distance)?;
    let theta_e = (KAPPA_MAS_PER_SOLAR_MASS * m * pi_rel.to_mas()).sqrt();
    Ok(Angle::from_mas(ensure_finite("theta_E", theta_e)?))
}

/// Einstein timescale tE = θ_E / μ_rel.
pub fn einstein_timescale(theta_e: Angle, mu_rel: ProperMotion) -> Result<Time, LensingError> {
    let mu_rel = checked_proper_motion(mu_rel)?;
    let t_e = theta_e / mu_rel;
    ensure_finite("tE", t_e.to_days())?;
    Ok(t_e)
}

/// Inverts tE = θ_E / μ_rel for the Einstein angle.
///
/// Fails with `DegenerateGeometry` when μ_rel falls below
/// [`MIN_RELATIVE_PROPER_MOTION_MAS_YR`]; the subsequent mass inversion
/// would otherwise run toward zero mass for any finite tE, and the forward
/// relation toward infinite tE.
pub fn einstein_angle_from_timescale(
    t_e: Time,
    mu_rel: ProperMotion,
) -> Result<Angle, LensingError> {
    let days = ensure_finite("tE", t_e.to_days())?;
    if days <= 0.0 {
        return Err(LensingError::degenerate(format!(
            "Einstein timescale {days} d is not positive"
        )));
    }
    let mu_rel = checked_proper_motion(mu_rel)?;
    let theta_e = mu_rel * t_e;
    ensure_finite("theta_E", theta_e.to_mas())?;
    Ok(theta_e)
}

/// Inverts θ_E² = κ M π_rel for the lens mass.
pub fn lens_mass_from_einstein_angle(
    theta_e: Angle,
    lens_distance: Length,
    source_distance: Length,
) -> Result<Mass, LensingError> {
    let pi_rel = checked_relative_parallax(lens_distance, source_distance)?;
    let mass = theta_e.to_mas().powi(2) / (KAPPA_MAS_PER_SOLAR_MASS * pi_rel.to_mas());
    let mass = ensure_finite("M_L", mass)?;
    if mass <= 0.0 {
        return Err(LensingError::degenerate(format!(
            "inverted lens mass {mass} M☉ is not positive"
        )));
    }
    Ok(Mass::from_solar_masses(mass))
}

/// Finite-source parameter ρ = θ★ / θ_E.
pub fn finite_source_parameter(
    source_angular_radius: Angle,
    theta_e: Angle,
) -> Result<f64, LensingError> {
    ensure_finite("rho", source_angular_radius / theta_e)
}
