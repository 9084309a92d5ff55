use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaChaRng;

use crate::error::GenerationError;
use crate::prior::{Prior, PriorSet, PriorValue, SampledPriors, ValueKind};

#[test]
fn test_fixed_prior_always_returns_its_value() {
    let mut rng = ChaChaRng::seed_from_u64(1);
    let prior = Prior::fixed(0.25);
    for _ in 0..10 {
        assert_eq!(prior.sample(&mut rng), PriorValue::Scalar(0.25));
    }
}

#[test]
fn test_uniform_prior_respects_half_open_bounds() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let prior = Prior::uniform(-1.0, 3.0);

    let samples: Vec<f64> = (0..1000)
        .map(|_| prior.sample(&mut rng).as_scalar().unwrap())
        .collect();
    for &sample in &samples {
        assert!((-1.0..3.0).contains(&sample), "Sample {} out of bounds", sample);
    }

    let mean: f64 = samples.iter().sum::<f64>() / samples.len() as f64;
    assert!((mean - 1.0).abs() < 0.15, "Mean {} should be close to 1.0", mean);
}

#[test]
fn test_log_uniform_prior_is_flat_in_log_space() {
    let mut rng = ChaChaRng::seed_from_u64(42);
    let prior = Prior::log_uniform(1.0, 100.0);

    let samples: Vec<f64> = (0..2000)
        .map(|_| prior.sample(&mut rng).as_scalar().unwrap())
        .collect();
    for &sample in &samples {
        assert!((1.0..100.0).contains(&sample), "Sample {} out of bounds", sample);
    }

    // Half the mass should sit below the geometric midpoint, 10
    let below = samples.iter().filter(|&&s| s < 10.0).count() as f64 / samples.len() as f64;
    assert!((below - 0.5).abs() < 0.05, "Fraction below 10 was {}", below);
}

#[test]
fn test_choice_prior_draws_only_listed_options() {
    let mut rng = ChaChaRng::seed_from_u64(3);
    let prior = Prior::choice(["center_of_mass", "primary", "central_caustic"]);

    let mut seen = BTreeMap::new();
    for _ in 0..300 {
        let label = prior.sample(&mut rng).as_label().unwrap().to_string();
        *seen.entry(label).or_insert(0) += 1;
    }
    assert_eq!(seen.len(), 3);
    assert!(seen.values().all(|&count| count > 50));
}

#[test]
fn test_weighted_choice_follows_weights() {
    let mut rng = ChaChaRng::seed_from_u64(5);
    let prior = Prior::weighted_choice([(1.0, 0.9), (2.0, 0.1), (3.0, 0.0)]);

    let mut ones = 0;
    for _ in 0..1000 {
        let value = prior.sample(&mut rng).as_scalar().unwrap();
        assert_ne!(value, 3.0, "zero-weight option was drawn");
        if value == 1.0 {
            ones += 1;
        }
    }
    assert!(ones > 850 && ones < 950, "Drew option 1 {} times", ones);
}

#[test]
fn test_per_band_uniform_draws_every_band() {
    let mut rng = ChaChaRng::seed_from_u64(9);
    let prior = Prior::per_band_uniform(0.0, 2.0, ["I", "V", "R"]);

    match prior.sample(&mut rng) {
        PriorValue::PerBand(values) => {
            assert_eq!(values.len(), 3);
            for (band, value) in &values {
                assert!((0.0..2.0).contains(value), "{} ratio {} out of bounds", band, value);
            }
        }
        other => panic!("expected per-band values, got {:?}", other),
    }
}

#[test]
fn test_same_seed_gives_same_sequence() {
    let prior = Prior::uniform(0.0, 1.0);
    let mut first = ChaChaRng::seed_from_u64(1909);
    let mut second = ChaChaRng::seed_from_u64(1909);

    for _ in 0..20 {
        assert_eq!(prior.sample(&mut first), prior.sample(&mut second));
    }
}

#[test]
fn test_invalid_priors_are_rejected() {
    let cases = [
        Prior::uniform(2.0, 1.0),
        Prior::uniform(0.0, f64::INFINITY),
        Prior::log_uniform(0.0, 10.0),
        Prior::choice(Vec::<f64>::new()),
        Prior::Choice {
            options: vec![PriorValue::Scalar(1.0)],
            weights: Some(vec![0.5, 0.5]),
        },
        Prior::weighted_choice([(1.0, 0.0), (2.0, 0.0)]),
        Prior::per_band_uniform(0.0, 1.0, Vec::<String>::new()),
        Prior::fixed(f64::NAN),
        Prior::fixed(PriorValue::PerBand(BTreeMap::from([
            ("I".to_string(), 0.2),
            ("V".to_string(), f64::INFINITY),
        ]))),
        Prior::choice([1.0, f64::NAN]),
        Prior::choice([PriorValue::PerBand(BTreeMap::from([("I".to_string(), f64::NAN)]))]),
    ];

    for prior in cases {
        assert!(
            matches!(prior.validate("x"), Err(GenerationError::InvalidPrior { .. })),
            "{:?} should be invalid",
            prior
        );
    }
}

#[test]
fn test_prior_kinds() {
    assert!(Prior::uniform(0.0, 1.0).yields(ValueKind::Scalar));
    assert!(Prior::fixed("primary").yields(ValueKind::Label));
    assert!(!Prior::choice([PriorValue::from(1.0), PriorValue::from("a")]).yields(ValueKind::Scalar));
    assert!(Prior::per_band_uniform(0.0, 1.0, ["I"]).yields(ValueKind::PerBand));
}

#[test]
fn test_sample_in_order_draws_each_name_once() {
    let priors = PriorSet::new()
        .with("a", Prior::uniform(0.0, 1.0))
        .with("b", Prior::fixed(4.0))
        .with("unused", Prior::uniform(0.0, 1.0));
    let mut rng = ChaChaRng::seed_from_u64(0);

    let sampled = priors.sample_in_order(&["b", "a"], &mut rng).unwrap();
    assert_eq!(sampled.scalar("b").unwrap(), 4.0);
    assert!(sampled.contains("a"));
    assert!(!sampled.contains("unused"));
}

#[test]
fn test_sampled_priors_report_wrong_kinds() {
    let sampled = SampledPriors::new().with("origin", "primary").with("q", 0.01);

    assert_eq!(sampled.label("origin").unwrap(), "primary");
    assert!(matches!(sampled.scalar("origin"), Err(GenerationError::InvalidPrior { .. })));
    assert!(matches!(sampled.label("q"), Err(GenerationError::InvalidPrior { .. })));
    assert!(matches!(sampled.scalar("tE"), Err(GenerationError::MissingPrior { .. })));
    assert_eq!(sampled.optional_scalar("s").unwrap(), None);
}
