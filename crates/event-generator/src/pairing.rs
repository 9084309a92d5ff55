//! Source–lens pairing over a catalog snapshot.
//!
//! Each event draws a source uniformly, then a lens uniformly from the stars
//! strictly inside the window `D_min < D_L < D_S − ΔD`. Lenses are drawn with
//! replacement across events.

use std::ops::Range;

use rand::Rng;
use rand_chacha::ChaChaRng;
use tracing::debug;
use units::Length;

use crate::catalog::CatalogTable;
use crate::config::GenerationSettings;
use crate::error::{GenerationError, Result};

/// Source redraws allowed per event when no explicit limit is configured
pub const DEFAULT_MAX_SOURCE_ATTEMPTS: usize = 100;

/// Catalog rows chosen as source and lens for one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventPair {
    pub source_index: usize,
    pub lens_index: usize,
    pub source_distance: Length,
    pub lens_distance: Length,
}

/// Draws [`EventPair`]s from a catalog.
///
/// Row indices are sorted by distance once, so the foreground window of any
/// source is a contiguous slice found by binary search.
#[derive(Debug, Clone)]
pub struct PairBuilder<'a> {
    catalog: &'a CatalogTable,
    distances: Vec<Length>,
    by_distance: Vec<usize>,
    min_lens_distance: Length,
    gap: Length,
    max_source_attempts: usize,
}

impl<'a> PairBuilder<'a> {
    /// # Arguments
    /// * `catalog` - Candidate stars
    /// * `min_lens_distance` - D_min; lenses must lie strictly beyond it
    /// * `gap` - ΔD; lenses must lie strictly closer than `D_S − ΔD`
    pub fn new(catalog: &'a CatalogTable, min_lens_distance: Length, gap: Length) -> Self {
        let distances: Vec<Length> = catalog.rows().iter().map(|row| row.distance()).collect();
        let mut by_distance: Vec<usize> = (0..distances.len()).collect();
        by_distance.sort_by(|&a, &b| distances[a].to_au().total_cmp(&distances[b].to_au()));

        Self {
            catalog,
            distances,
            by_distance,
            min_lens_distance,
            gap,
            max_source_attempts: DEFAULT_MAX_SOURCE_ATTEMPTS,
        }
    }

    pub fn from_settings(catalog: &'a CatalogTable, settings: &GenerationSettings) -> Self {
        Self::new(
            catalog,
            Length::from_parsecs(settings.min_lens_distance_pc),
            Length::from_parsecs(settings.lens_source_gap_pc),
        )
        .with_max_source_attempts(settings.max_source_attempts)
    }

    pub fn with_max_source_attempts(mut self, attempts: usize) -> Self {
        self.max_source_attempts = attempts.max(1);
        self
    }

    /// Positions in `by_distance` of stars that may lens a source at `source_distance`.
    fn foreground_window(&self, source_distance: Length) -> Range<usize> {
        let limit = source_distance - self.gap;
        let start = self
            .by_distance
            .partition_point(|&i| self.distances[i] <= self.min_lens_distance);
        let end = self
            .by_distance
            .partition_point(|&i| self.distances[i] < limit);
        start..end.max(start)
    }

    /// Number of catalog stars that could lens the given row.
    pub fn foreground_count(&self, source_index: usize) -> usize {
        self.foreground_window(self.distances[source_index]).len()
    }

    /// One pairing attempt: fails with `NoForegroundLens` if the drawn source has no candidates.
    pub fn draw(&self, rng: &mut ChaChaRng) -> Result<EventPair> {
        let source_index = rng.random_range(0..self.catalog.len());
        let source_distance = self.distances[source_index];

        let window = self.foreground_window(source_distance);
        if window.is_empty() {
            return Err(GenerationError::NoForegroundLens {
                source_index,
                source_distance_pc: source_distance.to_parsecs(),
            });
        }

        let lens_index = self.by_distance[rng.random_range(window)];
        Ok(EventPair {
            source_index,
            lens_index,
            source_distance,
            lens_distance: self.distances[lens_index],
        })
    }

    /// Redraws the source until a lens is found, up to the attempt limit.
    pub fn draw_with_retry(&self, event_index: usize, rng: &mut ChaChaRng) -> Result<EventPair> {
        let mut last_source = 0;
        for attempt in 1..=self.max_source_attempts {
            match self.draw(rng) {
                Ok(pair) => return Ok(pair),
                Err(GenerationError::NoForegroundLens {
                    source_index,
                    source_distance_pc,
                }) => {
                    debug!(
                        event_index,
                        source_index,
                        source_distance_pc,
                        attempt,
                        "no foreground lens, redrawing source"
                    );
                    last_source = source_index;
                }
                Err(other) => return Err(other),
            }
        }
        Err(GenerationError::PairingExhausted {
            event_index,
            source_index: last_source,
            attempts: self.max_source_attempts,
        })
    }

    pub fn build_pairs(&self, n_events: usize, rng: &mut ChaChaRng) -> Result<Vec<EventPair>> {
        (0..n_events)
            .map(|event_index| self.draw_with_retry(event_index, rng))
            .collect()
    }
}

/// Draws `n_events` pairs with the default retry limit.
pub fn build_pairs(
    catalog: &CatalogTable,
    n_events: usize,
    min_distance_pc: f64,
    delta_distance_pc: f64,
    rng: &mut ChaChaRng,
) -> Result<Vec<EventPair>> {
    PairBuilder::new(
        catalog,
        Length::from_parsecs(min_distance_pc),
        Length::from_parsecs(delta_distance_pc),
    )
    .build_pairs(n_events, rng)
}
