//! Top-level event table generation.
//!
//! Per event, in order: pair a source and lens, draw every required prior
//! once, derive the physics, reconcile blending, and append the record. All
//! draws come from one `ChaChaRng` that is never reseeded mid-run, so the
//! same seed, configuration, priors and catalog give an identical table.

use rand::SeedableRng;
use rand_chacha::ChaChaRng;
use tracing::{info, warn};

use crate::blending::{check_flux_ratio_bands, reconcile, BlendComponent};
use crate::catalog::CatalogTable;
use crate::config::{GenerationConfig, GenerationSettings};
use crate::derivation::derive;
use crate::error::{GenerationError, Result};
use crate::pairing::{EventPair, PairBuilder};
use crate::prior::{PriorSet, SampledPriors};
use crate::record::{EventRecord, EventTable, TableMetadata};
use crate::requirements::{self, BLEND_G, T0, U0};

/// A validated generation run over one catalog snapshot.
#[derive(Debug, Clone)]
pub struct TableAssembler<'a> {
    catalog: &'a CatalogTable,
    config: GenerationConfig,
    settings: GenerationSettings,
    priors: PriorSet,
    draw_order: Vec<&'static str>,
}

impl<'a> TableAssembler<'a> {
    /// Validates the settings and priors against the configuration before anything is sampled.
    pub fn new(
        catalog: &'a CatalogTable,
        config: GenerationConfig,
        settings: GenerationSettings,
        priors: PriorSet,
    ) -> Result<Self> {
        settings.validate()?;
        let draw_order = requirements::validate(&config, &priors)?;
        if config.custom_blending {
            if let Some(blend_g) = priors.get(BLEND_G) {
                check_flux_ratio_bands(blend_g, catalog.bands())?;
            }
        }

        if config.use_physical_s && !config.model_type.is_binary() {
            warn!(model = %config.model_type, "use_physical_s only applies to USBL, ignoring");
        }
        if config.sample_t_e_directly && config.use_trilegal_mass {
            warn!("sample_tE_directly overrides use_trilegal_mass, catalog masses are ignored");
        }

        Ok(Self {
            catalog,
            config,
            settings,
            priors,
            draw_order,
        })
    }

    /// Prior names in the order they are drawn for each event.
    pub fn draw_order(&self) -> &[&'static str] {
        &self.draw_order
    }

    /// Runs with a generator seeded from the settings.
    pub fn generate(&self) -> Result<EventTable> {
        let mut rng = ChaChaRng::seed_from_u64(self.settings.seed);
        self.generate_with_rng(&mut rng)
    }

    /// Runs with a caller-owned generator; aborts on the first fatal error.
    pub fn generate_with_rng(&self, rng: &mut ChaChaRng) -> Result<EventTable> {
        let n_events = self.settings.n_events;
        info!(
            n_events,
            seed = self.settings.seed,
            model = %self.config.model_type,
            catalog_rows = self.catalog.len(),
            "generating event table"
        );

        let pairs = PairBuilder::from_settings(self.catalog, &self.settings);
        let mut records = Vec::with_capacity(n_events);

        for event_index in 0..n_events {
            let pair = pairs.draw_with_retry(event_index, rng)?;
            let sampled = self
                .priors
                .sample_in_order(&self.draw_order, rng)
                .map_err(|e| e.in_event(event_index))?;
            let record = self
                .assemble(event_index, &pair, &sampled)
                .map_err(|e| e.in_event(event_index))?;
            records.push(record);
        }

        info!(events = records.len(), "event table complete");

        Ok(EventTable {
            metadata: TableMetadata {
                seed: self.settings.seed,
                n_events,
                model_type: self.config.model_type,
                bands: self.catalog.bands().to_vec(),
            },
            records,
        })
    }

    fn assemble(
        &self,
        sim_id: usize,
        pair: &EventPair,
        sampled: &SampledPriors,
    ) -> Result<EventRecord> {
        let source = self.catalog.row(pair.source_index);
        let lens = self.catalog.row(pair.lens_index);

        let theta_star = source.angular_radius(self.settings.fallback_source_radius_solar);
        let derived = derive(pair, self.catalog, sampled, &self.config, theta_star)?;

        let blend = if self.config.custom_blending {
            let g = sampled.get(BLEND_G).ok_or_else(|| GenerationError::MissingPrior {
                names: vec![BLEND_G.to_string()],
            })?;
            BlendComponent::FluxRatio(g)
        } else {
            BlendComponent::Magnitudes(&lens.magnitudes)
        };
        let blending = reconcile(&source.magnitudes, blend, self.config.custom_blending)?;

        let t0 = lensing::ensure_finite("t0", sampled.scalar(T0)?)?;
        let u0 = lensing::ensure_finite("u0", sampled.scalar(U0)?)?;
        let binary = derived.binary.as_ref();

        Ok(EventRecord {
            sim_id,
            model_type: self.config.model_type,
            ra: source.ra_deg,
            dec: source.dec_deg,
            t0,
            u0,
            t_e: derived.t_e.to_days(),
            rho: derived.rho,
            pi_en: derived.parallax.north,
            pi_ee: derived.parallax.east,
            theta_e_mas: derived.theta_e.to_mas(),
            pi_rel_mas: derived.pi_rel.to_mas(),
            mu_rel: derived.mu_rel.to_mas_per_year(),
            d_s: pair.source_distance.to_parsecs(),
            d_l: pair.lens_distance.to_parsecs(),
            m_l: derived.lens_mass.to_solar_masses(),
            source_index: pair.source_index,
            lens_index: pair.lens_index,
            q: binary.map(|b| b.q),
            alpha: binary.map(|b| b.alpha),
            origin: binary.map(|b| b.origin.clone()),
            s: binary.map(|b| b.s),
            a_au: binary.and_then(|b| b.semi_major_axis_au),
            s_physical: binary.map(|b| b.s_physical),
            t_m: derived.t_m,
            source_mags: blending.source_mags,
            blend_g: blending.blend_g,
            blend_mags: blending.blend_mags,
        })
    }
}

/// Validates inputs and generates the full event table in one call.
pub fn generate_event_table(
    catalog: &CatalogTable,
    config: GenerationConfig,
    settings: GenerationSettings,
    priors: PriorSet,
) -> Result<EventTable> {
    TableAssembler::new(catalog, config, settings, priors)?.generate()
}
