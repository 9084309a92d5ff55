//! Declarative prior distributions.
//!
//! A [`Prior`] is a closed set of sampling strategies. Every draw takes the
//! run's single `ChaChaRng` so a seed fixes the whole stream of values.

use std::collections::BTreeMap;

use rand::Rng;
use rand_chacha::ChaChaRng;
use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// A single sampled value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriorValue {
    Scalar(f64),
    Label(String),
    PerBand(BTreeMap<String, f64>),
}

/// Shape of a [`PriorValue`], used to check priors against their consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Label,
    PerBand,
}

impl PriorValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            PriorValue::Scalar(_) => ValueKind::Scalar,
            PriorValue::Label(_) => ValueKind::Label,
            PriorValue::PerBand(_) => ValueKind::PerBand,
        }
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            PriorValue::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            PriorValue::Label(label) => Some(label),
            _ => None,
        }
    }

    pub fn bands(&self) -> Option<Vec<&str>> {
        match self {
            PriorValue::PerBand(per_band) => Some(per_band.keys().map(String::as_str).collect()),
            _ => None,
        }
    }
}

impl From<f64> for PriorValue {
    fn from(value: f64) -> Self {
        PriorValue::Scalar(value)
    }
}

impl From<&str> for PriorValue {
    fn from(value: &str) -> Self {
        PriorValue::Label(value.to_string())
    }
}

/// Sampling strategy for one named parameter.
///
/// # Example
/// ```
/// use event_generator::{Prior, PriorValue};
/// use rand::SeedableRng;
/// use rand_chacha::ChaChaRng;
///
/// let mut rng = ChaChaRng::seed_from_u64(7);
/// let t_e = Prior::log_uniform(1.0, 100.0).sample(&mut rng);
/// let t_e = t_e.as_scalar().unwrap();
/// assert!((1.0..100.0).contains(&t_e));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prior {
    /// Always returns `value`; consumes no randomness.
    Fixed { value: PriorValue },
    /// Uniform on `[low, high)`.
    Uniform { low: f64, high: f64 },
    /// Uniform in log10 on `[log10(low), log10(high))`.
    LogUniform { low: f64, high: f64 },
    /// One of `options`, uniformly or by relative `weights`.
    Choice {
        options: Vec<PriorValue>,
        #[serde(default)]
        weights: Option<Vec<f64>>,
    },
    /// An independent `Uniform(low, high)` per band, drawn in listed band order.
    PerBandUniform {
        low: f64,
        high: f64,
        bands: Vec<String>,
    },
}

impl Prior {
    pub fn fixed(value: impl Into<PriorValue>) -> Self {
        Prior::Fixed {
            value: value.into(),
        }
    }

    pub fn uniform(low: f64, high: f64) -> Self {
        Prior::Uniform { low, high }
    }

    pub fn log_uniform(low: f64, high: f64) -> Self {
        Prior::LogUniform { low, high }
    }

    pub fn choice<V: Into<PriorValue>>(options: impl IntoIterator<Item = V>) -> Self {
        Prior::Choice {
            options: options.into_iter().map(Into::into).collect(),
            weights: None,
        }
    }

    pub fn weighted_choice<V: Into<PriorValue>>(
        options: impl IntoIterator<Item = (V, f64)>,
    ) -> Self {
        let (options, weights): (Vec<PriorValue>, Vec<f64>) = options
            .into_iter()
            .map(|(option, weight)| (option.into(), weight))
            .unzip();
        Prior::Choice {
            options,
            weights: Some(weights),
        }
    }

    pub fn per_band_uniform<S: Into<String>>(
        low: f64,
        high: f64,
        bands: impl IntoIterator<Item = S>,
    ) -> Self {
        Prior::PerBandUniform {
            low,
            high,
            bands: bands.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks the parameters can be sampled.
    pub fn validate(&self, name: &str) -> Result<()> {
        match self {
            Prior::Fixed { value } => check_value(name, value),
            Prior::Uniform { low, high } => check_bounds(name, *low, *high),
            Prior::LogUniform { low, high } => {
                check_bounds(name, *low, *high)?;
                if *low <= 0.0 {
                    return Err(GenerationError::invalid_prior(
                        name,
                        format!("log-uniform lower bound must be positive, got {low}"),
                    ));
                }
                Ok(())
            }
            Prior::Choice { options, weights } => {
                if options.is_empty() {
                    return Err(GenerationError::invalid_prior(name, "choice has no options"));
                }
                for option in options {
                    check_value(name, option)?;
                }
                if let Some(weights) = weights {
                    if weights.len() != options.len() {
                        return Err(GenerationError::invalid_prior(
                            name,
                            format!(
                                "{} weights given for {} options",
                                weights.len(),
                                options.len()
                            ),
                        ));
                    }
                    if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
                        return Err(GenerationError::invalid_prior(
                            name,
                            "choice weights must be finite and non-negative",
                        ));
                    }
                    if weights.iter().sum::<f64>() <= 0.0 {
                        return Err(GenerationError::invalid_prior(
                            name,
                            "choice weights sum to zero",
                        ));
                    }
                }
                Ok(())
            }
            Prior::PerBandUniform { low, high, bands } => {
                check_bounds(name, *low, *high)?;
                if bands.is_empty() {
                    return Err(GenerationError::invalid_prior(name, "no bands listed"));
                }
                Ok(())
            }
        }
    }

    /// Whether every value this prior can produce has the given kind.
    pub fn yields(&self, kind: ValueKind) -> bool {
        match self {
            Prior::Fixed { value } => value.kind() == kind,
            Prior::Uniform { .. } | Prior::LogUniform { .. } => kind == ValueKind::Scalar,
            Prior::Choice { options, .. } => options.iter().all(|o| o.kind() == kind),
            Prior::PerBandUniform { .. } => kind == ValueKind::PerBand,
        }
    }

    /// Band lists of every per-band value this prior can produce.
    pub fn band_sets(&self) -> Vec<Vec<&str>> {
        match self {
            Prior::Fixed { value } => value.bands().into_iter().collect(),
            Prior::Choice { options, .. } => options.iter().filter_map(PriorValue::bands).collect(),
            Prior::PerBandUniform { bands, .. } => vec![bands.iter().map(String::as_str).collect()],
            Prior::Uniform { .. } | Prior::LogUniform { .. } => Vec::new(),
        }
    }

    /// Draws one value. Assumes [`Prior::validate`] has passed.
    pub fn sample(&self, rng: &mut ChaChaRng) -> PriorValue {
        match self {
            Prior::Fixed { value } => value.clone(),
            Prior::Uniform { low, high } => PriorValue::Scalar(sample_uniform(rng, *low, *high)),
            Prior::LogUniform { low, high } => {
                let exponent = sample_uniform(rng, low.log10(), high.log10());
                PriorValue::Scalar(10f64.powf(exponent))
            }
            Prior::Choice { options, weights } => {
                let index = match weights {
                    Some(weights) => sample_weighted_index(rng, weights),
                    None => rng.random_range(0..options.len()),
                };
                options[index].clone()
            }
            Prior::PerBandUniform { low, high, bands } => PriorValue::PerBand(
                bands
                    .iter()
                    .map(|band| (band.clone(), sample_uniform(rng, *low, *high)))
                    .collect(),
            ),
        }
    }
}

fn check_value(name: &str, value: &PriorValue) -> Result<()> {
    match value {
        PriorValue::Scalar(v) if !v.is_finite() => Err(GenerationError::invalid_prior(
            name,
            format!("value {v} is not finite"),
        )),
        PriorValue::PerBand(per_band) => {
            match per_band.iter().find(|(_, v)| !v.is_finite()) {
                Some((band, v)) => Err(GenerationError::invalid_prior(
                    name,
                    format!("{band} value {v} is not finite"),
                )),
                None => Ok(()),
            }
        }
        _ => Ok(()),
    }
}

fn check_bounds(name: &str, low: f64, high: f64) -> Result<()> {
    if !low.is_finite() || !high.is_finite() {
        return Err(GenerationError::invalid_prior(name, "bounds must be finite"));
    }
    if low >= high {
        return Err(GenerationError::invalid_prior(
            name,
            format!("lower bound {low} is not below upper bound {high}"),
        ));
    }
    Ok(())
}

fn sample_uniform(rng: &mut ChaChaRng, low: f64, high: f64) -> f64 {
    let u: f64 = rng.random();
    let value = low + u * (high - low);
    // Rounding can land exactly on `high` when the span is tiny
    if value < high {
        value
    } else {
        low
    }
}

fn sample_weighted_index(rng: &mut ChaChaRng, weights: &[f64]) -> usize {
    let total: f64 = weights.iter().sum();
    let roll: f64 = rng.random::<f64>() * total;
    let mut cumulative = 0.0;

    for (i, &weight) in weights.iter().enumerate() {
        cumulative += weight;
        if roll < cumulative {
            return i;
        }
    }

    // Floating-point shortfall: fall back to the last option with weight
    weights.iter().rposition(|w| *w > 0.0).unwrap_or(0)
}

/// The named priors supplied for a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorSet(BTreeMap<String, Prior>);

impl PriorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, prior: Prior) -> Self {
        self.insert(name, prior);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, prior: Prior) -> Option<Prior> {
        self.0.insert(name.into(), prior)
    }

    pub fn get(&self, name: &str) -> Option<&Prior> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Draws each named prior once, in the order given.
    pub fn sample_in_order(&self, order: &[&str], rng: &mut ChaChaRng) -> Result<SampledPriors> {
        let mut values = BTreeMap::new();
        for &name in order {
            let prior = self.get(name).ok_or_else(|| GenerationError::MissingPrior {
                names: vec![name.to_string()],
            })?;
            values.insert(name.to_string(), prior.sample(rng));
        }
        Ok(SampledPriors(values))
    }
}

impl<S: Into<String>> FromIterator<(S, Prior)> for PriorSet {
    fn from_iter<I: IntoIterator<Item = (S, Prior)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(name, prior)| (name.into(), prior)).collect())
    }
}

/// One event's worth of drawn prior values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampledPriors(BTreeMap<String, PriorValue>);

impl SampledPriors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<PriorValue>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&PriorValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// A required scalar value.
    pub fn scalar(&self, name: &str) -> Result<f64> {
        match self.get(name) {
            Some(PriorValue::Scalar(value)) => Ok(*value),
            Some(other) => Err(GenerationError::invalid_prior(
                name,
                format!("expected a number, drew {other:?}"),
            )),
            None => Err(GenerationError::MissingPrior {
                names: vec![name.to_string()],
            }),
        }
    }

    /// An optional scalar value; present-but-wrong-kind is still an error.
    pub fn optional_scalar(&self, name: &str) -> Result<Option<f64>> {
        if self.contains(name) {
            self.scalar(name).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn label(&self, name: &str) -> Result<&str> {
        match self.get(name) {
            Some(PriorValue::Label(label)) => Ok(label),
            Some(other) => Err(GenerationError::invalid_prior(
                name,
                format!("expected a label, drew {other:?}"),
            )),
            None => Err(GenerationError::MissingPrior {
                names: vec![name.to_string()],
            }),
        }
    }
}
