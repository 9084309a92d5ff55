use std::collections::BTreeMap;

use approx::assert_relative_eq;
use lensing::blending::combined_magnitude;

use crate::blending::{reconcile, BandMagnitudes, BlendComponent};
use crate::error::GenerationError;
use crate::prior::PriorValue;

fn mags(i: f64, v: f64) -> BandMagnitudes {
    BTreeMap::from([("I".to_string(), i), ("V".to_string(), v)])
}

#[test]
fn test_flux_ratio_blending_broadcasts_scalar() {
    let g = PriorValue::Scalar(0.4);
    let blending = reconcile(&mags(18.0, 20.0), BlendComponent::FluxRatio(&g), true).unwrap();

    assert_eq!(blending.source_mags, mags(18.0, 20.0));
    assert_eq!(blending.blend_g, Some(mags(0.4, 0.4)));
    assert!(blending.blend_mags.is_none());
}

#[test]
fn test_flux_ratio_blending_per_band() {
    let g = PriorValue::PerBand(mags(0.1, 0.9));
    let blending = reconcile(&mags(18.0, 20.0), BlendComponent::FluxRatio(&g), true).unwrap();
    assert_eq!(blending.blend_g, Some(mags(0.1, 0.9)));
}

#[test]
fn test_catalog_blending_keeps_lens_magnitudes() {
    let lens = mags(19.5, 22.0);
    let blending = reconcile(&mags(18.0, 20.0), BlendComponent::Magnitudes(&lens), false).unwrap();

    assert_eq!(blending.blend_mags, Some(lens));
    assert!(blending.blend_g.is_none());
    assert!(blending.decompose().is_none());
}

#[test]
fn test_blend_must_match_flag() {
    let g = PriorValue::Scalar(0.4);
    let lens = mags(19.5, 22.0);

    assert!(matches!(
        reconcile(&mags(18.0, 20.0), BlendComponent::FluxRatio(&g), false),
        Err(GenerationError::Configuration(_))
    ));
    assert!(matches!(
        reconcile(&mags(18.0, 20.0), BlendComponent::Magnitudes(&lens), true),
        Err(GenerationError::Configuration(_))
    ));
}

#[test]
fn test_missing_bands_are_rejected() {
    let partial = PriorValue::PerBand(BTreeMap::from([("I".to_string(), 0.2)]));
    assert!(matches!(
        reconcile(&mags(18.0, 20.0), BlendComponent::FluxRatio(&partial), true),
        Err(GenerationError::InvalidPrior { .. })
    ));

    let lens_i_only = BTreeMap::from([("I".to_string(), 19.0)]);
    assert!(matches!(
        reconcile(&mags(18.0, 20.0), BlendComponent::Magnitudes(&lens_i_only), false),
        Err(GenerationError::Configuration(_))
    ));
}

#[test]
fn test_invalid_flux_ratios_are_rejected() {
    for g in [-0.1, f64::NAN, f64::INFINITY] {
        let g = PriorValue::Scalar(g);
        assert!(matches!(
            reconcile(&mags(18.0, 20.0), BlendComponent::FluxRatio(&g), true),
            Err(GenerationError::InvalidPrior { .. })
        ));
    }

    let label = PriorValue::Label("bright".to_string());
    assert!(reconcile(&mags(18.0, 20.0), BlendComponent::FluxRatio(&label), true).is_err());
}

#[test]
fn test_decompose_recovers_baseline() {
    let g = PriorValue::PerBand(mags(0.25, 3.0));
    let blending = reconcile(&mags(18.0, 20.0), BlendComponent::FluxRatio(&g), true).unwrap();
    let split = blending.decompose().unwrap();

    for (band, (source, blend)) in &split {
        assert!(source > &blending.source_mags[band]);
        assert_relative_eq!(
            combined_magnitude(*source, *blend),
            blending.source_mags[band],
            epsilon = 1e-10
        );
    }

    // Equal light when g = 1
    let even = PriorValue::Scalar(1.0);
    let blending = reconcile(&mags(18.0, 20.0), BlendComponent::FluxRatio(&even), true).unwrap();
    let (source, blend) = blending.decompose().unwrap()["I"];
    assert_relative_eq!(source, blend, epsilon = 1e-12);
    assert_relative_eq!(source, 18.0 + 2.5 * 2f64.log10(), epsilon = 1e-12);
}
