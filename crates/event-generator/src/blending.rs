//! Reconciles the two blending parameterisations.
//!
//! * Flux-ratio blending stores the baseline magnitude as `source_mags` plus
//!   `blend_g` per band. Splitting the baseline into source and blend light is
//!   left to the light-curve simulator via m_base = m_source − 2.5 log10(1 + g).
//! * Catalog blending stores the source's and the lens's own magnitudes.
//!
//! Exactly one of `blend_g` and `blend_mags` is populated.

use std::collections::BTreeMap;

use lensing::blending::{blend_magnitude_from_baseline, source_magnitude_from_baseline};

use crate::error::{GenerationError, Result};
use crate::prior::{Prior, PriorValue};
use crate::requirements::BLEND_G;

/// Per-band magnitudes keyed by band name.
pub type BandMagnitudes = BTreeMap<String, f64>;

/// What the blend is described by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlendComponent<'a> {
    /// Drawn `blend_g`: one ratio for all bands or one per band
    FluxRatio(&'a PriorValue),
    /// Blend-only magnitudes, one per band
    Magnitudes(&'a BandMagnitudes),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blending {
    /// Baseline magnitudes under flux-ratio blending, source-only otherwise
    pub source_mags: BandMagnitudes,
    pub blend_mags: Option<BandMagnitudes>,
    pub blend_g: Option<BandMagnitudes>,
}

impl Blending {
    /// Splits flux-ratio baselines into (source-only, blend-only) magnitudes per band.
    ///
    /// Returns `None` for catalog blending, where the split is already stored.
    pub fn decompose(&self) -> Option<BTreeMap<String, (f64, f64)>> {
        let blend_g = self.blend_g.as_ref()?;
        Some(
            self.source_mags
                .iter()
                .filter_map(|(band, &m_base)| {
                    blend_g.get(band).map(|&g| {
                        (
                            band.clone(),
                            (
                                source_magnitude_from_baseline(m_base, g),
                                blend_magnitude_from_baseline(m_base, g),
                            ),
                        )
                    })
                })
                .collect(),
        )
    }
}

/// # Arguments
/// * `magnitudes` - Baseline magnitudes (flux-ratio blending) or source-only magnitudes
/// * `blend` - The blend description matching `custom_blending`
/// * `custom_blending` - Whether the run describes blending by flux ratio
pub fn reconcile(
    magnitudes: &BandMagnitudes,
    blend: BlendComponent<'_>,
    custom_blending: bool,
) -> Result<Blending> {
    match (blend, custom_blending) {
        (BlendComponent::FluxRatio(g), true) => Ok(Blending {
            source_mags: magnitudes.clone(),
            blend_mags: None,
            blend_g: Some(per_band_ratio(g, magnitudes)?),
        }),
        (BlendComponent::Magnitudes(blend_mags), false) => {
            if let Some(band) = magnitudes.keys().find(|band| !blend_mags.contains_key(*band)) {
                return Err(GenerationError::config(format!(
                    "blend magnitudes have no '{band}' band"
                )));
            }
            Ok(Blending {
                source_mags: magnitudes.clone(),
                blend_mags: Some(
                    magnitudes
                        .keys()
                        .map(|band| (band.clone(), blend_mags[band]))
                        .collect(),
                ),
                blend_g: None,
            })
        }
        (BlendComponent::FluxRatio(_), false) => Err(GenerationError::config(
            "blend flux ratio given but custom_blending is disabled",
        )),
        (BlendComponent::Magnitudes(_), true) => Err(GenerationError::config(
            "blend magnitudes given but custom_blending is enabled",
        )),
    }
}

/// Checks every per-band `blend_g` the prior can draw covers the catalog's bands.
pub fn check_flux_ratio_bands(blend_g: &Prior, bands: &[String]) -> Result<()> {
    for drawn in blend_g.band_sets() {
        let missing: Vec<&str> = bands
            .iter()
            .map(String::as_str)
            .filter(|band| !drawn.contains(band))
            .collect();
        if !missing.is_empty() {
            return Err(GenerationError::invalid_prior(
                BLEND_G,
                format!("no flux ratio for bands {}", missing.join(", ")),
            ));
        }
    }
    Ok(())
}

fn per_band_ratio(g: &PriorValue, magnitudes: &BandMagnitudes) -> Result<BandMagnitudes> {
    let ratios: BandMagnitudes = match g {
        PriorValue::Scalar(g) => magnitudes.keys().map(|band| (band.clone(), *g)).collect(),
        PriorValue::PerBand(per_band) => {
            let missing: Vec<&str> = magnitudes
                .keys()
                .filter(|band| !per_band.contains_key(*band))
                .map(String::as_str)
                .collect();
            if !missing.is_empty() {
                return Err(GenerationError::invalid_prior(
                    BLEND_G,
                    format!("no flux ratio for bands {}", missing.join(", ")),
                ));
            }
            magnitudes
                .keys()
                .map(|band| (band.clone(), per_band[band]))
                .collect()
        }
        PriorValue::Label(label) => {
            return Err(GenerationError::invalid_prior(
                BLEND_G,
                format!("expected a flux ratio, drew '{label}'"),
            ))
        }
    };

    if let Some((band, g)) = ratios.iter().find(|(_, g)| !g.is_finite() || **g < 0.0) {
        return Err(GenerationError::invalid_prior(
            BLEND_G,
            format!("flux ratio {g} in {band} is not a finite non-negative number"),
        ));
    }
    Ok(ratios)
}
