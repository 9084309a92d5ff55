//! Synthetic catalogs for unit tests.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use units::Length;

use crate::catalog::{CatalogRow, CatalogTable};
use crate::prior::{Prior, PriorSet};
use crate::requirements::{LENS_MASS, T0, U0};

pub fn star(distance_pc: f64, pm_ra: f64, pm_dec: f64) -> CatalogRow {
    CatalogRow {
        ra_deg: 268.5,
        dec_deg: -29.0,
        distance_modulus: Length::from_parsecs(distance_pc).to_distance_modulus(),
        proper_motion_ra: pm_ra,
        proper_motion_dec: pm_dec,
        mass_solar: Some(0.5),
        radius_solar: Some(1.0),
        magnitudes: BTreeMap::from([("I".to_string(), 18.0), ("V".to_string(), 20.5)]),
    }
}

/// Bulge-like field: distances spread from 0.5 to 10 kpc.
pub fn synthetic_rows(n: usize, seed: u64) -> Vec<CatalogRow> {
    let mut rng = ChaChaRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let distance_pc = rng.random_range(500.0..10_000.0);
            let mut row = star(
                distance_pc,
                rng.random_range(-8.0..8.0),
                rng.random_range(-8.0..8.0),
            );
            row.ra_deg = rng.random_range(268.0..269.0);
            row.dec_deg = rng.random_range(-29.5..-28.5);
            row.mass_solar = Some(rng.random_range(0.08..1.5));
            row.radius_solar = Some(rng.random_range(0.5..3.0));
            row.magnitudes = BTreeMap::from([
                ("I".to_string(), rng.random_range(15.0..22.0)),
                ("V".to_string(), rng.random_range(17.0..24.0)),
            ]);
            row
        })
        .collect()
}

pub fn synthetic_catalog(n: usize) -> CatalogTable {
    CatalogTable::new(synthetic_rows(n, 11)).expect("synthetic catalog is valid")
}

/// The priors every configuration needs under the default flags.
pub fn base_priors() -> PriorSet {
    PriorSet::new()
        .with(T0, Prior::uniform(0.0, 100.0))
        .with(U0, Prior::uniform(0.0, 1.0))
        .with(LENS_MASS, Prior::log_uniform(0.01, 1.0))
}
