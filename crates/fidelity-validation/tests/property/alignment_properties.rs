use fidelity_core::config::AlignmentConfig;
use fidelity_core::models::AlignmentEntry;
use fidelity_validation::SequenceAligner;
use proptest::prelude::*;

const VOCAB: &[&str] = &[
    "the", "cat", "sat", "on", "mat", "dog", "ran", "far", "away", "and", "then", "slept",
];

fn words(max: usize) -> impl Strategy<Value = Vec<&'static str>> {
    prop::collection::vec(prop::sample::select(VOCAB.to_vec()), 1..max)
}

fn restyle(word: &str, style: u8) -> String {
    match style % 4 {
        0 => word.to_string(),
        1 => format!("**{word}**"),
        2 => word.to_uppercase(),
        _ => format!("{word},"),
    }
}

proptest! {
    #[test]
    fn identity_has_no_violations(src in words(40)) {
        let text = src.join(" ");
        let result = SequenceAligner::new(AlignmentConfig::default()).align(&text, &text).unwrap();
        prop_assert!(!result.has_violations());
        prop_assert_eq!(result.preservation_ratio(), 1.0);
    }

    #[test]
    fn restyling_preserves_every_word(
        src in words(40),
        styles in prop::collection::vec(any::<u8>(), 40),
    ) {
        let source = src.join(" ");
        let transformed = src
            .iter()
            .zip(&styles)
            .map(|(w, s)| restyle(w, *s))
            .collect::<Vec<_>>()
            .join(" ");
        let result = SequenceAligner::new(AlignmentConfig::default())
            .align(&source, &transformed)
            .unwrap();
        prop_assert_eq!(result.preserved_count(), src.len());
        prop_assert!(!result.has_violations());
    }

    #[test]
    fn every_source_token_is_classified_once(src in words(30), tr in words(30), window in 0usize..12) {
        let config = AlignmentConfig { lookahead_window: window, ..AlignmentConfig::default() };
        let result = SequenceAligner::new(config)
            .align(&src.join(" "), &tr.join(" "))
            .unwrap();
        let mut seen: Vec<usize> = result
            .entries
            .iter()
            .filter_map(AlignmentEntry::source)
            .map(|p| p.index)
            .collect();
        seen.sort_unstable();
        prop_assert_eq!(seen, (0..src.len()).collect::<Vec<_>>());

        let mut consumed: Vec<usize> = result
            .entries
            .iter()
            .filter_map(AlignmentEntry::transformed)
            .map(|p| p.index)
            .collect();
        consumed.sort_unstable();
        consumed.dedup();
        prop_assert_eq!(consumed, (0..tr.len()).collect::<Vec<_>>());

        let ratio = result.preservation_ratio();
        prop_assert!((0.0..=1.0).contains(&ratio));
    }

    #[test]
    fn promoting_a_prefix_to_a_heading_loses_nothing(src in words(30), split in 1usize..6) {
        let k = split.min(src.len());
        prop_assume!(!src[k..].starts_with(&src[..k]));
        let source = src.join(" ");
        let transformed = format!("## {}\n\n{}", src[..k].join(" "), src[k..].join(" "));
        let result = SequenceAligner::new(AlignmentConfig::default())
            .align(&source, &transformed)
            .unwrap();
        prop_assert_eq!(result.preserved_count(), src.len());
        prop_assert!(!result.has_violations());
    }
}
