//! Synthetic microlensing event generation
//!
//! Turns a catalog snapshot plus declarative priors into a table of
//! physically self-consistent event parameters for a light-curve simulator:
//! source–lens pairing, prior sampling, Einstein-ring physics, parallax,
//! binary separation, and blending.

pub mod assembly;
pub mod blending;
pub mod catalog;
pub mod config;
pub mod derivation;
pub mod error;
pub mod pairing;
pub mod prior;
pub mod record;
pub mod requirements;

#[cfg(test)]
mod test_catalog;

#[cfg(test)]
mod blending_test;
#[cfg(test)]
mod derivation_test;
#[cfg(test)]
mod prior_test;

pub use assembly::{generate_event_table, TableAssembler};
pub use blending::{reconcile, BandMagnitudes, BlendComponent, Blending};
pub use catalog::{CatalogRow, CatalogSource, CatalogTable, ConeQuery, InMemoryCatalog};
pub use config::{GenerationConfig, GenerationSettings, ModelType};
pub use derivation::{derive, BinaryGeometry, DerivedQuantities, MassOrigin};
pub use error::{GenerationError, Result};
pub use pairing::{build_pairs, EventPair, PairBuilder};
pub use prior::{Prior, PriorSet, PriorValue, SampledPriors, ValueKind};
pub use record::{EventRecord, EventTable, TableMetadata};
pub use requirements::{resolve_required, SeparationSource};
