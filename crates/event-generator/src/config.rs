//! Generation flags and run sizing.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GenerationError, Result};
use crate::pairing::DEFAULT_MAX_SOURCE_ATTEMPTS;

/// Light-curve model family the downstream simulator will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelType {
    /// Point source, point lens
    #[serde(rename = "PSPL")]
    Pspl,
    /// Finite source, point lens
    #[serde(rename = "FSPL")]
    Fspl,
    /// Uniform-source binary lens
    #[serde(rename = "USBL")]
    Usbl,
    /// Navarro–Frenk–White extended lens
    #[serde(rename = "NFW")]
    Nfw,
    /// Boson-star extended lens
    #[serde(rename = "BS")]
    BosonStar,
}

impl ModelType {
    pub fn is_binary(&self) -> bool {
        matches!(self, ModelType::Usbl)
    }

    /// Extended-lens models carry a mass-profile timescale `t_m`.
    pub fn is_extended(&self) -> bool {
        matches!(self, ModelType::Nfw | ModelType::BosonStar)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Pspl => "PSPL",
            ModelType::Fspl => "FSPL",
            ModelType::Usbl => "USBL",
            ModelType::Nfw => "NFW",
            ModelType::BosonStar => "BS",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which optional physics paths are active.
///
/// * `use_physical_s` only affects [`ModelType::Usbl`].
/// * `sample_tE_directly` overrides `use_trilegal_mass`: the lens mass is
///   then derived from the sampled timescale and catalog masses are ignored.
///
/// # Examples
///
/// ```
/// use event_generator::{GenerationConfig, ModelType};
///
/// let config = GenerationConfig {
///     model_type: ModelType::Usbl,
///     enable_parallax: true,
///     ..GenerationConfig::default()
/// };
/// assert!(!config.physical_vectors);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub model_type: ModelType,
    pub enable_parallax: bool,
    /// Take the parallax direction from catalog proper motions instead of `traj_angle_rad`
    pub physical_vectors: bool,
    /// Describe blending by flux ratio `g` instead of catalog lens magnitudes
    pub custom_blending: bool,
    /// Derive the binary separation from a sampled semi-major axis
    pub use_physical_s: bool,
    /// Take lens masses from the catalog instead of a mass prior
    pub use_trilegal_mass: bool,
    /// Sample tE and derive the lens mass from it
    #[serde(rename = "sample_tE_directly")]
    pub sample_t_e_directly: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_type: ModelType::Pspl,
            enable_parallax: false,
            physical_vectors: false,
            custom_blending: false,
            use_physical_s: false,
            use_trilegal_mass: false,
            sample_t_e_directly: false,
        }
    }
}

impl GenerationConfig {
    /// Lens masses come from the catalog rather than a prior or the timescale.
    pub fn uses_catalog_mass(&self) -> bool {
        self.use_trilegal_mass && !self.sample_t_e_directly
    }
}

/// Run sizing and pairing window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub n_events: usize,
    pub seed: u64,
    /// Lenses must be farther than this (D_min)
    pub min_lens_distance_pc: f64,
    /// Lenses must be at least this much closer than their source (ΔD)
    pub lens_source_gap_pc: f64,
    /// Source redraws allowed per event before the run is aborted
    pub max_source_attempts: usize,
    /// Stellar radius assumed for catalog rows that carry none
    pub fallback_source_radius_solar: f64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            n_events: 1000,
            seed: 1909,
            min_lens_distance_pc: 50.0,
            lens_source_gap_pc: 100.0,
            max_source_attempts: DEFAULT_MAX_SOURCE_ATTEMPTS,
            fallback_source_radius_solar: 1.0,
        }
    }
}

impl GenerationSettings {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_lens_distance_pc.is_finite() && self.min_lens_distance_pc >= 0.0) {
            return Err(GenerationError::config(format!(
                "min_lens_distance_pc must be finite and non-negative, got {}",
                self.min_lens_distance_pc
            )));
        }
        if !(self.lens_source_gap_pc.is_finite() && self.lens_source_gap_pc >= 0.0) {
            return Err(GenerationError::config(format!(
                "lens_source_gap_pc must be finite and non-negative, got {}",
                self.lens_source_gap_pc
            )));
        }
        if self.max_source_attempts == 0 {
            return Err(GenerationError::config(
                "max_source_attempts must be at least 1",
            ));
        }
        if !(self.fallback_source_radius_solar.is_finite() && self.fallback_source_radius_solar > 0.0)
        {
            return Err(GenerationError::config(format!(
                "fallback_source_radius_solar must be positive, got {}",
                self.fallback_source_radius_solar
            )));
        }
        Ok(())
    }
}
