//! Magnitude algebra for blended sources.
//!
//! With blend flux ratio g = F_blend / F_source the baseline (total)
//! magnitude is m_base = m_source − 2.5 log10(1 + g).

/// Baseline magnitude of a source blended at flux ratio `g`.
pub fn baseline_magnitude(source_magnitude: f64, g: f64) -> f64 {
    source_magnitude - 2.5 * (1.0 + g).log10()
}

/// Source-only magnitude recovered from a baseline magnitude.
pub fn source_magnitude_from_baseline(baseline_magnitude: f64, g: f64) -> f64 {
    baseline_magnitude + 2.5 * (1.0 + g).log10()
}

/// Blend-only magnitude recovered from a baseline magnitude.
///
/// Infinite (no blend light) when `g == 0`.
pub fn blend_magnitude_from_baseline(baseline_magnitude: f64, g: f64) -> f64 {
    source_magnitude_from_baseline(baseline_magnitude, g) - 2.5 * g.log10()
}

/// Total magnitude of two unresolved components.
pub fn combined_magnitude(first: f64, second: f64) -> f64 {
    -2.5 * (10f64.powf(-0.4 * first) + 10f64.powf(-0.4 * second)).log10()
}

/// Blend flux ratio implied by separate source and blend magnitudes.
pub fn flux_ratio(source_magnitude: f64, blend_magnitude: f64) -> f64 {
    10f64.powf(-0.4 * (blend_magnitude - source_magnitude))
}
