//! Output rows handed to the light-curve simulator.

use serde::{Deserialize, Serialize};

use crate::blending::BandMagnitudes;
use crate::config::ModelType;

/// One generated event.
///
/// Every column is always serialized; conditional columns are `null` when
/// they do not apply. `piEN`/`piEE` are NaN when parallax is not modelled
/// and serialize as the string `"NaN"` so they survive formats without one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub sim_id: usize,
    pub model_type: ModelType,
    pub ra: f64,
    pub dec: f64,
    pub t0: f64,
    pub u0: f64,
    #[serde(rename = "tE")]
    pub t_e: f64,
    pub rho: f64,
    #[serde(rename = "piEN", with = "nan_sentinel")]
    pub pi_en: f64,
    #[serde(rename = "piEE", with = "nan_sentinel")]
    pub pi_ee: f64,
    #[serde(rename = "theta_E_mas")]
    pub theta_e_mas: f64,
    pub pi_rel_mas: f64,
    /// mas/yr
    pub mu_rel: f64,
    /// Source distance in pc
    #[serde(rename = "D_S")]
    pub d_s: f64,
    /// Lens distance in pc
    #[serde(rename = "D_L")]
    pub d_l: f64,
    /// Lens mass in M☉
    #[serde(rename = "M_L")]
    pub m_l: f64,
    pub source_index: usize,
    pub lens_index: usize,
    pub q: Option<f64>,
    pub alpha: Option<f64>,
    pub origin: Option<String>,
    pub s: Option<f64>,
    pub a_au: Option<f64>,
    pub s_physical: Option<bool>,
    pub t_m: Option<f64>,
    pub source_mags: BandMagnitudes,
    pub blend_g: Option<BandMagnitudes>,
    pub blend_mags: Option<BandMagnitudes>,
}

impl EventRecord {
    /// Column names in output order.
    pub const COLUMNS: &'static [&'static str] = &[
        "sim_id",
        "model_type",
        "ra",
        "dec",
        "t0",
        "u0",
        "tE",
        "rho",
        "piEN",
        "piEE",
        "theta_E_mas",
        "pi_rel_mas",
        "mu_rel",
        "D_S",
        "D_L",
        "M_L",
        "source_index",
        "lens_index",
        "q",
        "alpha",
        "origin",
        "s",
        "a_au",
        "s_physical",
        "t_m",
        "source_mags",
        "blend_g",
        "blend_mags",
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    pub seed: u64,
    pub n_events: usize,
    pub model_type: ModelType,
    pub bands: Vec<String>,
}

/// The ordered event table for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventTable {
    pub metadata: TableMetadata,
    pub records: Vec<EventRecord>,
}

impl EventTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn columns(&self) -> &'static [&'static str] {
        EventRecord::COLUMNS
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventRecord> {
        self.records.iter()
    }
}

/// Writes NaN as `"NaN"`; reads a number, `"NaN"` or `null`.
mod nan_sentinel {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    const NAN: &str = "NaN";

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str(NAN)
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        match Option::<Repr>::deserialize(deserializer)? {
            Some(Repr::Number(value)) => Ok(value),
            Some(Repr::Text(text)) if text == NAN => Ok(f64::NAN),
            Some(Repr::Text(text)) => Err(D::Error::custom(format!(
                "expected a number or \"{NAN}\", got \"{text}\""
            ))),
            None => Ok(f64::NAN),
        }
    }
}
