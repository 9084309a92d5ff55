//! Which priors a configuration needs.
//!
//! Requirements are an explicit rule table: each rule pairs a predicate on
//! [`GenerationConfig`] with the names it contributes, listed in draw order.
//! The required set is the union over matching rules.

use std::collections::BTreeSet;

use tracing::debug;

use crate::config::GenerationConfig;
use crate::error::{GenerationError, Result};
use crate::prior::{Prior, PriorSet, ValueKind};

pub const T0: &str = "t0";
pub const U0: &str = "u0";
pub const T_E: &str = "tE";
pub const LENS_MASS: &str = "lens_mass_solar";
pub const TRAJECTORY_ANGLE: &str = "traj_angle_rad";
pub const BLEND_G: &str = "blend_g";
pub const MASS_RATIO: &str = "q";
pub const ALPHA: &str = "alpha";
pub const ORIGIN: &str = "origin";
pub const SEMI_MAJOR_AXIS: &str = "semi_major_axis_au";
pub const SEPARATION: &str = "s";
pub const T_M: &str = "t_m";

struct RequirementRule {
    applies: fn(&GenerationConfig) -> bool,
    names: &'static [&'static str],
}

/// Evaluated top to bottom; this is also the draw order.
const RULES: &[RequirementRule] = &[
    RequirementRule {
        applies: |_| true,
        names: &[T0, U0],
    },
    // Sampling tE directly overrides the mass prior regardless of catalog masses
    RequirementRule {
        applies: |c| c.sample_t_e_directly,
        names: &[T_E],
    },
    RequirementRule {
        applies: |c| !c.sample_t_e_directly && !c.use_trilegal_mass,
        names: &[LENS_MASS],
    },
    RequirementRule {
        applies: |c| c.enable_parallax && !c.physical_vectors,
        names: &[TRAJECTORY_ANGLE],
    },
    RequirementRule {
        applies: |c| c.custom_blending,
        names: &[BLEND_G],
    },
    RequirementRule {
        applies: |c| c.model_type.is_binary(),
        names: &[MASS_RATIO, ALPHA, ORIGIN],
    },
    RequirementRule {
        applies: |c| c.model_type.is_extended(),
        names: &[T_M],
    },
];

/// Where a binary lens gets its separation from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeparationSource {
    /// Projected from a sampled semi-major axis
    Physical,
    /// The sampled `s` prior
    Direct,
}

impl SeparationSource {
    pub fn prior_name(&self) -> &'static str {
        match self {
            SeparationSource::Physical => SEMI_MAJOR_AXIS,
            SeparationSource::Direct => SEPARATION,
        }
    }
}

/// Names every configuration of `config` requires, independent of the supplied priors.
///
/// The binary-lens separation is an exactly-one-of choice between
/// `semi_major_axis_au` and `s` and is resolved against the supplied priors
/// by [`validate`].
pub fn resolve_required(config: &GenerationConfig) -> BTreeSet<&'static str> {
    ordered_required(config).into_iter().collect()
}

fn ordered_required(config: &GenerationConfig) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| (rule.applies)(config))
        .flat_map(|rule| rule.names.iter().copied())
        .collect()
}

/// Picks the binary separation path from the supplied priors.
///
/// Exactly one of `semi_major_axis_au` and `s` must be present. A
/// semi-major axis without `use_physical_s` cannot be used and is rejected;
/// `use_physical_s` with only `s` falls back to the direct path.
pub fn resolve_separation(
    config: &GenerationConfig,
    priors: &PriorSet,
) -> Result<SeparationSource> {
    let has_axis = priors.contains(SEMI_MAJOR_AXIS);
    let has_s = priors.contains(SEPARATION);

    match (has_axis, has_s) {
        (true, true) => Err(GenerationError::config(format!(
            "binary lens needs exactly one of '{SEMI_MAJOR_AXIS}' and '{SEPARATION}', both were supplied"
        ))),
        (false, false) => Err(GenerationError::config(format!(
            "binary lens needs exactly one of '{SEMI_MAJOR_AXIS}' and '{SEPARATION}', neither was supplied"
        ))),
        (true, false) if !config.use_physical_s => Err(GenerationError::config(format!(
            "'{SEMI_MAJOR_AXIS}' was supplied but use_physical_s is disabled"
        ))),
        (true, false) => Ok(SeparationSource::Physical),
        (false, true) => {
            if config.use_physical_s {
                debug!("use_physical_s set without '{SEMI_MAJOR_AXIS}', using sampled '{SEPARATION}'");
            }
            Ok(SeparationSource::Direct)
        }
    }
}

/// Checks `priors` covers everything `config` needs and returns the draw order.
///
/// Every absent name is reported at once. Unused priors are ignored.
pub fn validate(config: &GenerationConfig, priors: &PriorSet) -> Result<Vec<&'static str>> {
    let mut order = ordered_required(config);
    if config.model_type.is_binary() {
        let separation = resolve_separation(config, priors)?;
        let after_origin = order
            .iter()
            .position(|name| *name == ORIGIN)
            .map_or(order.len(), |i| i + 1);
        order.insert(after_origin, separation.prior_name());
    }

    let mut missing: Vec<String> = order
        .iter()
        .filter(|name| !priors.contains(name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        missing.sort();
        return Err(GenerationError::MissingPrior { names: missing });
    }

    for &name in &order {
        if let Some(prior) = priors.get(name) {
            prior.validate(name)?;
            check_kind(name, prior)?;
        }
    }

    Ok(order)
}

fn check_kind(name: &str, prior: &Prior) -> Result<()> {
    let ok = match name {
        ORIGIN => prior.yields(ValueKind::Label),
        BLEND_G => prior.yields(ValueKind::Scalar) || prior.yields(ValueKind::PerBand),
        _ => prior.yields(ValueKind::Scalar),
    };
    if ok {
        Ok(())
    } else {
        let expected = match name {
            ORIGIN => "labels",
            BLEND_G => "numbers or per-band numbers",
            _ => "numbers",
        };
        Err(GenerationError::invalid_prior(
            name,
            format!("prior must produce {expected}"),
        ))
    }
}
