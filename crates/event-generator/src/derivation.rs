//! Per-event microlensing quantities from a paired source/lens and drawn priors.
//!
//! Derivation order:
//! 1. relative proper motion μ_rel = |μ_L − μ_S|
//! 2. mass branch (prior mass, catalog mass, or mass inverted from tE)
//! 3. ρ = θ★ / θ_E
//! 4. parallax components (or the NaN sentinel)
//! 5. binary separation
//!
//! Pure: no I/O and no randomness beyond the already drawn priors.

use lensing::{
    angular_separation, direction_from_angle, einstein_angle, einstein_angle_from_timescale,
    einstein_timescale, ensure_finite, finite_source_parameter, lens_mass_from_einstein_angle,
    relative_parallax, LensingError, MicrolensParallax, RelativeMotion,
};
use units::{Angle, Length, Mass, ProperMotion, Time};

use crate::catalog::CatalogTable;
use crate::config::GenerationConfig;
use crate::error::{GenerationError, Result};
use crate::pairing::EventPair;
use crate::prior::SampledPriors;
use crate::requirements::{
    ALPHA, LENS_MASS, MASS_RATIO, ORIGIN, SEMI_MAJOR_AXIS, SEPARATION, TRAJECTORY_ANGLE, T_E, T_M,
};

/// Where the lens mass came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MassOrigin {
    Prior,
    Catalog,
    /// Inverted from a sampled Einstein timescale
    Timescale,
}

/// Binary-lens geometry for USBL events.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryGeometry {
    pub q: f64,
    pub alpha: f64,
    pub origin: String,
    pub s: f64,
    /// Sampled semi-major axis when `s` was projected from it
    pub semi_major_axis_au: Option<f64>,
    /// True when `s` came from the physical path rather than the `s` prior
    pub s_physical: bool,
}

#[derive(Debug, Clone)]
pub struct DerivedQuantities {
    pub t_e: Time,
    pub theta_e: Angle,
    pub pi_rel: Angle,
    pub mu_rel: ProperMotion,
    pub lens_mass: Mass,
    pub mass_origin: MassOrigin,
    pub rho: f64,
    pub parallax: MicrolensParallax,
    pub binary: Option<BinaryGeometry>,
    pub t_m: Option<f64>,
}

impl DerivedQuantities {
    /// Every output must be finite except the parallax sentinel when parallax is off.
    fn ensure_finite(&self, parallax_enabled: bool) -> std::result::Result<(), LensingError> {
        ensure_finite("tE", self.t_e.to_days())?;
        ensure_finite("theta_E", self.theta_e.to_mas())?;
        ensure_finite("pi_rel", self.pi_rel.to_mas())?;
        ensure_finite("mu_rel", self.mu_rel.to_mas_per_year())?;
        ensure_finite("M_L", self.lens_mass.to_solar_masses())?;
        ensure_finite("rho", self.rho)?;
        if parallax_enabled {
            ensure_finite("piEN", self.parallax.north)?;
            ensure_finite("piEE", self.parallax.east)?;
        }
        if let Some(binary) = &self.binary {
            ensure_finite("q", binary.q)?;
            ensure_finite("alpha", binary.alpha)?;
            ensure_finite("s", binary.s)?;
        }
        if let Some(t_m) = self.t_m {
            ensure_finite("t_m", t_m)?;
        }
        Ok(())
    }
}

/// Derives every physical quantity for one event.
///
/// # Arguments
/// * `pair` - Source and lens rows with their distances
/// * `catalog` - The snapshot the pair indexes into
/// * `sampled` - This event's drawn priors
/// * `config` - Active physics paths
/// * `source_angular_radius` - θ★ of the source
pub fn derive(
    pair: &EventPair,
    catalog: &CatalogTable,
    sampled: &SampledPriors,
    config: &GenerationConfig,
    source_angular_radius: Angle,
) -> Result<DerivedQuantities> {
    let source = catalog.row(pair.source_index);
    let lens = catalog.row(pair.lens_index);
    let (d_l, d_s) = (pair.lens_distance, pair.source_distance);

    let motion = RelativeMotion::between(&source.sky_motion(), &lens.sky_motion());
    let mu_rel = motion.magnitude();
    let pi_rel = relative_parallax(d_l, d_s);

    let (lens_mass, theta_e, t_e, mass_origin) = if config.sample_t_e_directly {
        let t_e = Time::from_days(sampled.scalar(T_E)?);
        let theta_e = einstein_angle_from_timescale(t_e, mu_rel)?;
        let mass = lens_mass_from_einstein_angle(theta_e, d_l, d_s)?;
        (mass, theta_e, t_e, MassOrigin::Timescale)
    } else {
        let (mass, origin) = if config.use_trilegal_mass {
            let mass = lens.mass().ok_or(GenerationError::MissingCatalogMass {
                row_index: pair.lens_index,
            })?;
            (mass, MassOrigin::Catalog)
        } else {
            (Mass::from_solar_masses(sampled.scalar(LENS_MASS)?), MassOrigin::Prior)
        };
        let theta_e = einstein_angle(mass, d_l, d_s)?;
        let t_e = einstein_timescale(theta_e, mu_rel)?;
        (mass, theta_e, t_e, origin)
    };

    let rho = finite_source_parameter(source_angular_radius, theta_e)?;

    let parallax = if config.enable_parallax {
        let direction = if config.physical_vectors {
            motion.direction().ok_or_else(|| LensingError::DegenerateGeometry {
                reason: "relative proper motion has no direction".to_string(),
            })?
        } else {
            direction_from_angle(sampled.scalar(TRAJECTORY_ANGLE)?)
        };
        MicrolensParallax::along(pi_rel, theta_e, direction)?
    } else {
        MicrolensParallax::undefined()
    };

    let binary = if config.model_type.is_binary() {
        Some(binary_geometry(sampled, config, d_l, theta_e)?)
    } else {
        None
    };

    let t_m = if config.model_type.is_extended() {
        Some(sampled.scalar(T_M)?)
    } else {
        None
    };

    let derived = DerivedQuantities {
        t_e,
        theta_e,
        pi_rel,
        mu_rel,
        lens_mass,
        mass_origin,
        rho,
        parallax,
        binary,
        t_m,
    };
    derived.ensure_finite(config.enable_parallax)?;
    Ok(derived)
}

/// The physical path wins when `use_physical_s` is set and a semi-major axis was drawn;
/// any drawn `s` is then ignored.
fn binary_geometry(
    sampled: &SampledPriors,
    config: &GenerationConfig,
    lens_distance: Length,
    theta_e: Angle,
) -> Result<BinaryGeometry> {
    let semi_major_axis = if config.use_physical_s {
        sampled.optional_scalar(SEMI_MAJOR_AXIS)?
    } else {
        None
    };

    let (s, s_physical) = match semi_major_axis {
        Some(a_au) => (
            angular_separation(Length::from_au(a_au), lens_distance, theta_e)?,
            true,
        ),
        None => (sampled.scalar(SEPARATION)?, false),
    };

    Ok(BinaryGeometry {
        q: sampled.scalar(MASS_RATIO)?,
        alpha: sampled.scalar(ALPHA)?,
        origin: sampled.label(ORIGIN)?.to_string(),
        s,
        semi_major_axis_au: semi_major_axis,
        s_physical,
    })
}
