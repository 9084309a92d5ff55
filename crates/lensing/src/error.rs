use thiserror::Error;

/// Failures of the closed-form lensing relations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LensingError {
    /// The geometry makes a relation undefined (vanishing relative proper
    /// motion, a lens behind its source, a non-positive mass).
    #[error("degenerate lens geometry: {reason}")]
    DegenerateGeometry { reason: String },

    /// A derived quantity came out non-finite.
    #[error("derived {quantity} is not finite ({value})")]
    InvalidDerivation { quantity: &'static str, value: f64 },
}

impl LensingError {
    pub(crate) fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            reason: reason.into(),
        }
    }
}

/// Returns `value` unchanged if finite, otherwise an `InvalidDerivation` naming the quantity.
pub fn ensure_finite(quantity: &'static str, value: f64) -> Result<f64, LensingError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LensingError::InvalidDerivation { quantity, value })
    }
}
