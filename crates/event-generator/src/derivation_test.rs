use std::f64::consts::FRAC_PI_2;

use approx::assert_relative_eq;
use units::{Angle, DAYS_PER_YEAR};

use crate::catalog::CatalogTable;
use crate::config::{GenerationConfig, ModelType};
use crate::derivation::{derive, MassOrigin};
use crate::error::GenerationError;
use crate::pairing::EventPair;
use crate::prior::SampledPriors;
use crate::requirements::{
    ALPHA, LENS_MASS, MASS_RATIO, ORIGIN, SEMI_MAJOR_AXIS, SEPARATION, TRAJECTORY_ANGLE, T0, T_E,
    T_M, U0,
};
use crate::test_catalog::star;

const KAPPA: f64 = 8.144;

/// Source at 8 kpc at rest, lens at 4 kpc moving 5 mas/yr (4 north, 3 east).
fn bulge_pair() -> (CatalogTable, EventPair) {
    let catalog = CatalogTable::new(vec![star(8000.0, 0.0, 0.0), star(4000.0, 3.0, 4.0)]).unwrap();
    let pair = pair_of(&catalog);
    (catalog, pair)
}

fn pair_of(catalog: &CatalogTable) -> EventPair {
    EventPair {
        source_index: 0,
        lens_index: 1,
        source_distance: catalog.row(0).distance(),
        lens_distance: catalog.row(1).distance(),
    }
}

fn sampled() -> SampledPriors {
    SampledPriors::new()
        .with(T0, 10.0)
        .with(U0, 0.1)
        .with(LENS_MASS, 0.5)
}

fn theta_star() -> Angle {
    Angle::from_mas(0.002)
}

// θ_E for 0.5 M☉ with π_rel = 1/4 − 1/8 mas
fn expected_theta_e() -> f64 {
    (KAPPA * 0.5 * 0.125_f64).sqrt()
}

#[test]
fn test_mass_prior_branch() {
    let (catalog, pair) = bulge_pair();
    let derived = derive(
        &pair,
        &catalog,
        &sampled(),
        &GenerationConfig::default(),
        theta_star(),
    )
    .unwrap();

    assert_eq!(derived.mass_origin, MassOrigin::Prior);
    assert_relative_eq!(derived.pi_rel.to_mas(), 0.125, max_relative = 1e-9);
    assert_relative_eq!(derived.mu_rel.to_mas_per_year(), 5.0, max_relative = 1e-12);
    assert_relative_eq!(derived.theta_e.to_mas(), expected_theta_e(), max_relative = 1e-9);
    assert_relative_eq!(
        derived.t_e.to_days(),
        expected_theta_e() / 5.0 * DAYS_PER_YEAR,
        max_relative = 1e-9
    );
    assert_relative_eq!(derived.rho, 0.002 / expected_theta_e(), max_relative = 1e-9);
    assert!(derived.binary.is_none());
    assert!(derived.t_m.is_none());
}

#[test]
fn test_parallax_disabled_is_nan() {
    let (catalog, pair) = bulge_pair();
    let derived = derive(
        &pair,
        &catalog,
        &sampled(),
        &GenerationConfig::default(),
        theta_star(),
    )
    .unwrap();

    assert!(derived.parallax.north.is_nan());
    assert!(derived.parallax.east.is_nan());
    assert!(!derived.parallax.is_modelled());
}

#[test]
fn test_timescale_branch_inverts_mass() {
    let (catalog, pair) = bulge_pair();
    let forward = derive(
        &pair,
        &catalog,
        &sampled(),
        &GenerationConfig::default(),
        theta_star(),
    )
    .unwrap();

    let config = GenerationConfig {
        sample_t_e_directly: true,
        ..GenerationConfig::default()
    };
    let sampled = SampledPriors::new()
        .with(T0, 10.0)
        .with(U0, 0.1)
        .with(T_E, forward.t_e.to_days());
    let inverse = derive(&pair, &catalog, &sampled, &config, theta_star()).unwrap();

    assert_eq!(inverse.mass_origin, MassOrigin::Timescale);
    assert_relative_eq!(inverse.lens_mass.to_solar_masses(), 0.5, max_relative = 1e-9);
    assert_relative_eq!(inverse.theta_e.to_mas(), forward.theta_e.to_mas(), max_relative = 1e-9);
}

#[test]
fn test_timescale_branch_overrides_catalog_mass() {
    let (catalog, pair) = bulge_pair();
    let config = GenerationConfig {
        sample_t_e_directly: true,
        use_trilegal_mass: true,
        ..GenerationConfig::default()
    };
    let sampled = SampledPriors::new().with(T_E, 30.0);
    let derived = derive(&pair, &catalog, &sampled, &config, theta_star()).unwrap();

    assert_eq!(derived.mass_origin, MassOrigin::Timescale);
    assert_relative_eq!(derived.t_e.to_days(), 30.0, max_relative = 1e-12);
}

#[test]
fn test_catalog_mass_branch() {
    let (catalog, pair) = bulge_pair();
    let mut rows = catalog.rows().to_vec();
    rows[1].mass_solar = Some(0.3);
    let catalog = CatalogTable::new(rows.clone()).unwrap();
    let config = GenerationConfig {
        use_trilegal_mass: true,
        ..GenerationConfig::default()
    };

    let derived = derive(&pair, &catalog, &SampledPriors::new(), &config, theta_star()).unwrap();
    assert_eq!(derived.mass_origin, MassOrigin::Catalog);
    assert_relative_eq!(derived.lens_mass.to_solar_masses(), 0.3);

    rows[1].mass_solar = None;
    let catalog = CatalogTable::new(rows).unwrap();
    assert_eq!(
        derive(&pair, &catalog, &SampledPriors::new(), &config, theta_star()).unwrap_err(),
        GenerationError::MissingCatalogMass { row_index: 1 }
    );
}

#[test]
fn test_parallax_follows_proper_motion() {
    let (catalog, pair) = bulge_pair();
    let config = GenerationConfig {
        enable_parallax: true,
        physical_vectors: true,
        ..GenerationConfig::default()
    };
    let derived = derive(&pair, &catalog, &sampled(), &config, theta_star()).unwrap();

    let pi_e = 0.125 / expected_theta_e();
    assert_relative_eq!(derived.parallax.north, 0.8 * pi_e, max_relative = 1e-9);
    assert_relative_eq!(derived.parallax.east, 0.6 * pi_e, max_relative = 1e-9);
    assert_relative_eq!(derived.parallax.magnitude(), pi_e, max_relative = 1e-9);
}

#[test]
fn test_parallax_follows_trajectory_angle() {
    let (catalog, pair) = bulge_pair();
    let config = GenerationConfig {
        enable_parallax: true,
        ..GenerationConfig::default()
    };
    let sampled = sampled().with(TRAJECTORY_ANGLE, FRAC_PI_2);
    let derived = derive(&pair, &catalog, &sampled, &config, theta_star()).unwrap();

    let pi_e = 0.125 / expected_theta_e();
    assert_relative_eq!(derived.parallax.north, 0.0, epsilon = 1e-12);
    assert_relative_eq!(derived.parallax.east, pi_e, max_relative = 1e-9);
}

#[test]
fn test_vanishing_relative_motion_is_degenerate() {
    let catalog =
        CatalogTable::new(vec![star(8000.0, 2.0, -1.0), star(4000.0, 2.0, -1.0)]).unwrap();
    let pair = pair_of(&catalog);

    let mass_driven = derive(
        &pair,
        &catalog,
        &sampled(),
        &GenerationConfig::default(),
        theta_star(),
    )
    .unwrap_err();
    assert!(mass_driven.is_degenerate_geometry());

    let config = GenerationConfig {
        sample_t_e_directly: true,
        ..GenerationConfig::default()
    };
    let timescale_driven = derive(
        &pair,
        &catalog,
        &SampledPriors::new().with(T_E, 20.0),
        &config,
        theta_star(),
    )
    .unwrap_err();
    assert!(timescale_driven.is_degenerate_geometry());
}

fn binary_sampled() -> SampledPriors {
    sampled()
        .with(MASS_RATIO, 0.001)
        .with(ALPHA, 1.0)
        .with(ORIGIN, "center_of_mass")
}

#[test]
fn test_binary_separation_from_semi_major_axis() {
    let (catalog, pair) = bulge_pair();
    let config = GenerationConfig {
        model_type: ModelType::Usbl,
        use_physical_s: true,
        ..GenerationConfig::default()
    };
    let sampled = binary_sampled().with(SEMI_MAJOR_AXIS, 2.0);
    let binary = derive(&pair, &catalog, &sampled, &config, theta_star())
        .unwrap()
        .binary
        .unwrap();

    // 2 AU at 4 kpc subtends 0.5 mas
    assert_relative_eq!(binary.s, 0.5 / expected_theta_e(), max_relative = 1e-9);
    assert!(binary.s_physical);
    assert_eq!(binary.semi_major_axis_au, Some(2.0));
    assert_eq!(binary.origin, "center_of_mass");
}

#[test]
fn test_physical_separation_wins_over_sampled_s() {
    let (catalog, pair) = bulge_pair();
    let config = GenerationConfig {
        model_type: ModelType::Usbl,
        use_physical_s: true,
        ..GenerationConfig::default()
    };
    let sampled = binary_sampled()
        .with(SEMI_MAJOR_AXIS, 2.0)
        .with(SEPARATION, 1.3);
    let binary = derive(&pair, &catalog, &sampled, &config, theta_star())
        .unwrap()
        .binary
        .unwrap();
    assert!(binary.s_physical);
    assert!((binary.s - 1.3).abs() > 1e-3);
}

#[test]
fn test_binary_separation_sampled_directly() {
    let (catalog, pair) = bulge_pair();
    for use_physical_s in [false, true] {
        let config = GenerationConfig {
            model_type: ModelType::Usbl,
            use_physical_s,
            ..GenerationConfig::default()
        };
        let sampled = binary_sampled().with(SEPARATION, 1.3);
        let binary = derive(&pair, &catalog, &sampled, &config, theta_star())
            .unwrap()
            .binary
            .unwrap();

        assert_eq!(binary.s, 1.3);
        assert!(!binary.s_physical);
        assert_eq!(binary.semi_major_axis_au, None);
        assert_eq!(binary.q, 0.001);
    }
}

#[test]
fn test_non_finite_mass_ratio_is_invalid() {
    let (catalog, pair) = bulge_pair();
    let config = GenerationConfig {
        model_type: ModelType::Usbl,
        ..GenerationConfig::default()
    };
    let sampled = sampled()
        .with(MASS_RATIO, f64::NAN)
        .with(ALPHA, 1.0)
        .with(ORIGIN, "primary")
        .with(SEPARATION, 1.3);

    let err = derive(&pair, &catalog, &sampled, &config, theta_star()).unwrap_err();
    assert!(err.is_invalid_derivation());
    assert!(!err.is_degenerate_geometry());
}

#[test]
fn test_extended_lens_carries_mass_timescale() {
    let (catalog, pair) = bulge_pair();
    let config = GenerationConfig {
        model_type: ModelType::Nfw,
        ..GenerationConfig::default()
    };
    let derived = derive(&pair, &catalog, &sampled().with(T_M, 12.5), &config, theta_star()).unwrap();
    assert_eq!(derived.t_m, Some(12.5));
}
