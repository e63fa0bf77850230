//! Token canonicalization shared by every checker.

use fidelity_core::constants::EMPHASIS_MARKERS;

/// Canonical comparison form of a word.
///
/// Strips leading/trailing emphasis markers, strips trailing punctuation
/// (word-internal apostrophes survive), and lowercases. Idempotent. An
/// empty result means the input was pure markup or punctuation and is not
/// a token.
pub fn normalize(word: &str) -> String {
    word.trim_start_matches(EMPHASIS_MARKERS)
        .trim_end_matches(|c: char| EMPHASIS_MARKERS.contains(&c) || is_trailing_punctuation(c))
        .to_lowercase()
}

fn is_trailing_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '…' | '“' | '”' | '‘' | '’' | '„' | '«' | '»' | '—' | '–' | '¿' | '¡' | '·'
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markup_and_case_insensitive() {
        assert_eq!(normalize("**Word**,"), normalize("word"));
        assert_eq!(normalize("_Emphasis_."), "emphasis");
        assert_eq!(normalize("`code`"), "code");
    }

    #[test]
    fn keeps_internal_apostrophes() {
        assert_eq!(normalize("Don't"), "don't");
        assert_eq!(normalize("rock'n'roll,"), "rock'n'roll");
        assert_eq!(normalize("dogs'"), "dogs");
    }

    #[test]
    fn pure_punctuation_is_empty() {
        assert_eq!(normalize("—"), "");
        assert_eq!(normalize("##"), "");
        assert_eq!(normalize("-"), "");
        assert_eq!(normalize("..."), "");
    }

    #[test]
    fn leading_punctuation_is_kept() {
        assert_eq!(normalize("[Applause]"), "[applause");
        assert_eq!(normalize("\"Hello\""), "\"hello");
    }

    #[test]
    fn idempotent_on_samples() {
        for w in ["**Dr.**", "Kerr:**", "*word*.", ".*a", "ÉCOLE!", "x_y_", "«Quote»"] {
            let once = normalize(w);
            assert_eq!(normalize(&once), once, "not idempotent for {w:?}");
        }
    }
}
