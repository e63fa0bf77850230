use fidelity_core::config::FidelityConfig;
use fidelity_core::models::{InsertionCategory, QualityAssessment, QualityDimension, ScoreScale};
use proptest::prelude::*;

fn category() -> impl Strategy<Value = InsertionCategory> {
    prop::sample::select(InsertionCategory::ALL.to_vec())
}

proptest! {
    #[test]
    fn thresholds_inside_unit_interval_validate(t in 0.0f64..=1.0, p in 0.0f64..=1.0) {
        let mut c = FidelityConfig::default();
        c.quotes.fuzzy_threshold = t;
        c.alignment.min_preservation_ratio = p;
        prop_assert!(c.validate().is_ok());
    }

    #[test]
    fn thresholds_outside_unit_interval_fail(t in 1.0001f64..100.0) {
        let mut c = FidelityConfig::default();
        c.quotes.fuzzy_threshold = t;
        prop_assert!(c.validate().is_err());
        c.quotes.fuzzy_threshold = -t;
        prop_assert!(c.validate().is_err());
    }

    #[test]
    fn toml_roundtrip_preserves_config(
        threshold in 0.0f64..=1.0,
        iterations in 1u32..50,
        window in 0usize..64,
        categories in prop::collection::btree_set(category(), 0..6),
    ) {
        let mut c = FidelityConfig::default();
        c.quotes.fuzzy_threshold = threshold;
        c.refinement.max_iterations = iterations;
        c.alignment.lookahead_window = window;
        c.alignment.tolerated_categories = categories;
        let text = c.to_toml().unwrap();
        let back = FidelityConfig::from_toml(&text).unwrap();
        prop_assert_eq!(c, back);
    }

    #[test]
    fn aggregate_stays_within_scale(scores in prop::collection::vec(1.0f64..=5.0, 1..12)) {
        let dims: Vec<QualityDimension> = scores
            .iter()
            .enumerate()
            .map(|(i, s)| QualityDimension::new(format!("d{i}"), *s, "", ScoreScale::default()).unwrap())
            .collect();
        let a = QualityAssessment::new(1, dims).unwrap();
        prop_assert!(a.aggregate() >= 1.0 - 1e-9 && a.aggregate() <= 5.0 + 1e-9);
    }
}
