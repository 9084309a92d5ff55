//! Candidate stars handed over by the catalog query service.
//!
//! The query itself (network, authentication) is external; [`CatalogSource`]
//! is the seam, and [`InMemoryCatalog`] serves a snapshot already in memory.

use std::collections::BTreeMap;

use lensing::SkyMotion;
use serde::{Deserialize, Serialize};
use units::{Angle, Length, Mass, ProperMotion};

use crate::error::{GenerationError, Result};

/// One candidate star.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub distance_modulus: f64,
    /// μ_α* in mas/yr
    pub proper_motion_ra: f64,
    /// μ_δ in mas/yr
    pub proper_motion_dec: f64,
    #[serde(default)]
    pub mass_solar: Option<f64>,
    #[serde(default)]
    pub radius_solar: Option<f64>,
    /// Apparent magnitude per band
    pub magnitudes: BTreeMap<String, f64>,
}

impl CatalogRow {
    pub fn distance(&self) -> Length {
        Length::from_distance_modulus(self.distance_modulus)
    }

    pub fn sky_motion(&self) -> SkyMotion {
        SkyMotion::new(
            ProperMotion::from_mas_per_year(self.proper_motion_dec),
            ProperMotion::from_mas_per_year(self.proper_motion_ra),
        )
    }

    pub fn mass(&self) -> Option<Mass> {
        self.mass_solar.map(Mass::from_solar_masses)
    }

    /// Angular radius θ★ = R★ / D, using `fallback_radius_solar` when the row has no radius.
    pub fn angular_radius(&self, fallback_radius_solar: f64) -> Angle {
        let radius = Length::from_solar_radii(self.radius_solar.unwrap_or(fallback_radius_solar));
        Angle::subtended(radius, self.distance())
    }

    fn check(&self, row_index: usize) -> Result<()> {
        let invalid = |reason: String| GenerationError::InvalidCatalogRow { row_index, reason };
        let fields = [
            ("ra", self.ra_deg),
            ("dec", self.dec_deg),
            ("distance_modulus", self.distance_modulus),
            ("proper_motion_ra", self.proper_motion_ra),
            ("proper_motion_dec", self.proper_motion_dec),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(invalid(format!("{field} is not finite ({value})")));
            }
        }
        if let Some(mass) = self.mass_solar {
            if !mass.is_finite() || mass <= 0.0 {
                return Err(invalid(format!("mass {mass} M☉ is not positive")));
            }
        }
        if let Some(radius) = self.radius_solar {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(invalid(format!("radius {radius} R☉ is not positive")));
            }
        }
        if let Some((band, mag)) = self.magnitudes.iter().find(|(_, m)| !m.is_finite()) {
            return Err(invalid(format!("{band} magnitude is not finite ({mag})")));
        }
        Ok(())
    }
}

/// An immutable, validated catalog snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogTable {
    rows: Vec<CatalogRow>,
    bands: Vec<String>,
}

impl CatalogTable {
    /// Validates every row and that all rows share one band set.
    pub fn new(rows: Vec<CatalogRow>) -> Result<Self> {
        let first = rows.first().ok_or(GenerationError::EmptyCatalog)?;
        let bands: Vec<String> = first.magnitudes.keys().cloned().collect();

        for (row_index, row) in rows.iter().enumerate() {
            row.check(row_index)?;
            if !row.magnitudes.keys().eq(bands.iter()) {
                return Err(GenerationError::InvalidCatalogRow {
                    row_index,
                    reason: format!(
                        "bands {:?} differ from catalog bands {:?}",
                        row.magnitudes.keys().collect::<Vec<_>>(),
                        bands
                    ),
                });
            }
        }

        Ok(Self { rows, bands })
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> &CatalogRow {
        &self.rows[index]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Band names, sorted.
    pub fn bands(&self) -> &[String] {
        &self.bands
    }
}

/// A cone search with a distance-modulus cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeQuery {
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub radius_deg: f64,
    /// Keep stars with distance modulus at or below this
    pub distance_modulus_cut: f64,
    pub row_limit: usize,
}

/// Anything that can answer a cone query with a table of candidate stars.
pub trait CatalogSource {
    fn query(&self, query: &ConeQuery) -> Result<CatalogTable>;
}

/// Serves cone queries from rows already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    rows: Vec<CatalogRow>,
}

impl InMemoryCatalog {
    pub fn new(rows: Vec<CatalogRow>) -> Self {
        Self { rows }
    }
}

impl CatalogSource for InMemoryCatalog {
    fn query(&self, query: &ConeQuery) -> Result<CatalogTable> {
        let radius = Angle::from_degrees(query.radius_deg);
        let rows = self
            .rows
            .iter()
            .filter(|row| row.distance_modulus <= query.distance_modulus_cut)
            .filter(|row| {
                angular_distance(query.ra_deg, query.dec_deg, row.ra_deg, row.dec_deg) <= radius
            })
            .take(query.row_limit)
            .cloned()
            .collect();
        CatalogTable::new(rows)
    }
}

/// Great-circle separation (haversine form).
pub fn angular_distance(ra1_deg: f64, dec1_deg: f64, ra2_deg: f64, dec2_deg: f64) -> Angle {
    let (dec1, dec2) = (dec1_deg.to_radians(), dec2_deg.to_radians());
    let d_dec = dec2 - dec1;
    let d_ra = (ra2_deg - ra1_deg).to_radians();
    let h = (d_dec / 2.0).sin().powi(2) + dec1.cos() * dec2.cos() * (d_ra / 2.0).sin().powi(2);
    Angle::from_radians(2.0 * h.sqrt().min(1.0).asin())
}
