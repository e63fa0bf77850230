use fidelity_validation::normalize;
use fidelity_validation::quotes::similarity_ratio;
use proptest::prelude::*;

fn marked_word() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["", "*", "**", "_", "`", "~~"]),
        "[A-Za-z][a-z']{0,8}",
        prop::sample::select(vec!["", ".", ",", "!", "?\"", "…", ":"]),
    )
        .prop_map(|(m, w, p)| format!("{m}{w}{m}{p}"))
}

proptest! {
    #[test]
    fn normalize_is_idempotent(s in "\\PC{0,24}") {
        let once = normalize(&s);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn markup_and_case_do_not_matter(w in marked_word()) {
        let bare: String = w
            .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
            .to_string();
        prop_assert_eq!(normalize(&w), normalize(&bare.to_uppercase()));
    }

    #[test]
    fn similarity_stays_in_unit_interval(a in "[a-z ]{0,30}", b in "[a-z ]{0,30}") {
        let r = similarity_ratio(&a, &b);
        prop_assert!((0.0..=1.0).contains(&r));
        prop_assert!((r - similarity_ratio(&b, &a)).abs() < 1e-12);
    }
}
