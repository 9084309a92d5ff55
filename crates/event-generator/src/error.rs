//! Error taxonomy for event generation.
//!
//! Configuration and prior errors are raised before any sampling starts.
//! Pairing failures are retried per event before escalating; physics
//! failures abort the run immediately.

use lensing::LensingError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GenerationError {
    /// Invalid or contradictory configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Required priors absent from the supplied mapping (all of them, sorted).
    #[error("missing required priors: {}", .names.join(", "))]
    MissingPrior { names: Vec<String> },

    /// A prior whose parameters cannot be sampled, or whose values have the wrong kind.
    #[error("invalid prior '{name}': {reason}")]
    InvalidPrior { name: String, reason: String },

    #[error("catalog is empty")]
    EmptyCatalog,

    #[error("catalog row {row_index} is invalid: {reason}")]
    InvalidCatalogRow { row_index: usize, reason: String },

    /// Catalog masses were requested but this row has none.
    #[error("catalog row {row_index} has no stellar mass but catalog lens masses were requested")]
    MissingCatalogMass { row_index: usize },

    /// No catalog star lies in the foreground window of the drawn source.
    #[error("no foreground lens for source row {source_index} at {source_distance_pc:.1} pc")]
    NoForegroundLens {
        source_index: usize,
        source_distance_pc: f64,
    },

    /// Every source redraw for one event failed to find a foreground lens.
    #[error(
        "event {event_index}: no foreground lens after {attempts} source draws (last source row {source_index})"
    )]
    PairingExhausted {
        event_index: usize,
        source_index: usize,
        attempts: usize,
    },

    #[error(transparent)]
    Lensing(#[from] LensingError),

    /// A physics failure tagged with the event it occurred in.
    #[error("event {event_index}: {source}")]
    Event {
        event_index: usize,
        #[source]
        source: Box<GenerationError>,
    },
}

impl GenerationError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub(crate) fn invalid_prior(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPrior {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn in_event(self, event_index: usize) -> Self {
        match self {
            already @ Self::Event { .. } => already,
            other => Self::Event {
                event_index,
                source: Box::new(other),
            },
        }
    }

    /// The underlying error with any event tag removed.
    pub fn root(&self) -> &GenerationError {
        match self {
            Self::Event { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn is_degenerate_geometry(&self) -> bool {
        matches!(
            self.root(),
            Self::Lensing(LensingError::DegenerateGeometry { .. })
        )
    }

    pub fn is_invalid_derivation(&self) -> bool {
        matches!(
            self.root(),
            Self::Lensing(LensingError::InvalidDerivation { .. })
        )
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
