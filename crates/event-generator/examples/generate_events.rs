//! Generates a small binary-lens event table from a synthetic bulge field.
//!
//! ```sh
//! RUST_LOG=event_generator=debug cargo run -p event-generator --example generate_events
//! ```

use std::collections::BTreeMap;
use std::error::Error;

use event_generator::{
    CatalogRow, CatalogSource, ConeQuery, GenerationConfig, GenerationSettings, InMemoryCatalog,
    ModelType, Prior, PriorSet, TableAssembler,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use units::Length;

fn synthetic_field(n: usize) -> Vec<CatalogRow> {
    let mut rng = ChaChaRng::seed_from_u64(1);
    (0..n)
        .map(|_| {
            let distance = Length::from_parsecs(rng.random_range(1000.0..12_000.0));
            let i_mag = rng.random_range(15.0..21.0);
            CatalogRow {
                ra_deg: 268.5 + rng.random_range(-0.3..0.3),
                dec_deg: -29.0 + rng.random_range(-0.3..0.3),
                distance_modulus: distance.to_distance_modulus(),
                proper_motion_ra: rng.random_range(-6.0..6.0),
                proper_motion_dec: rng.random_range(-6.0..6.0),
                mass_solar: Some(rng.random_range(0.1..1.2)),
                radius_solar: None,
                magnitudes: BTreeMap::from([
                    ("I".to_string(), i_mag),
                    ("V".to_string(), i_mag + rng.random_range(1.5..3.0)),
                ]),
            }
        })
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "event_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let catalog = InMemoryCatalog::new(synthetic_field(2000)).query(&ConeQuery {
        ra_deg: 268.5,
        dec_deg: -29.0,
        radius_deg: 0.25,
        distance_modulus_cut: 15.5,
        row_limit: 1500,
    })?;
    info!(rows = catalog.len(), "catalog loaded");

    let config = GenerationConfig {
        model_type: ModelType::Usbl,
        enable_parallax: true,
        physical_vectors: true,
        use_physical_s: true,
        use_trilegal_mass: true,
        ..GenerationConfig::default()
    };
    let settings = GenerationSettings {
        n_events: 20,
        ..GenerationSettings::default()
    };
    let priors = PriorSet::new()
        .with("t0", Prior::uniform(0.0, 365.0))
        .with("u0", Prior::uniform(0.0, 1.0))
        .with("q", Prior::log_uniform(1e-4, 1.0))
        .with("alpha", Prior::uniform(0.0, std::f64::consts::TAU))
        .with("origin", Prior::choice(["center_of_mass", "primary"]))
        .with("semi_major_axis_au", Prior::log_uniform(0.3, 30.0));

    let table = TableAssembler::new(&catalog, config, settings, priors)?.generate()?;

    for record in table.iter().take(5) {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}
