//! Greedy tolerant alignment of two token streams.

use std::collections::BTreeSet;

use fidelity_core::models::{
    AlignmentEntry, AlignmentResult, InsertionCategory, Position, Token, TokenKind,
};

/// Align a source content stream against a transformed stream.
///
/// At each source position, in order: exact normalized match (a heading
/// or speaker label whose words reproduce the source here counts as one),
/// tolerated construct, inline correction of this word, bounded lookahead
/// (realignment), and only then Missing. A lookahead hit is rejected when
/// the transformed token at the cursor reappears sooner in the source,
/// since that divergence is a source-side deletion. Leftover transformed
/// words are Inserted.
///
/// `exempt` is carried into the result untouched.
pub fn align(
    source: &[Token],
    transformed: &[Token],
    tolerated: &BTreeSet<InsertionCategory>,
    lookahead_window: usize,
    exempt: Vec<Token>,
) -> AlignmentResult {
    let mut entries = Vec::with_capacity(source.len() + transformed.len());
    let (mut i, mut j) = (0usize, 0usize);

    while i < source.len() {
        let src = &source[i];
        let Some(tok) = transformed.get(j) else {
            entries.push(missing(i, src));
            i += 1;
            continue;
        };

        if tok.is_word() && tok.normalized == src.normalized {
            entries.push(matched(i, src, j, tok));
            i += 1;
            j += 1;
            continue;
        }

        if let Some(run) = decorated_run(transformed, j, source, i) {
            push_decorated(&mut entries, source, i, run, j, tok);
            i += run;
            j += 1;
            continue;
        }

        if let Some(category) = tok.construct_category() {
            if tolerated.contains(&category) {
                entries.push(tolerated_insertion(j, tok, category));
                j += 1;
                continue;
            }
        }

        if matches!(tok.kind, TokenKind::Correction { .. }) && tok.normalized == src.normalized {
            entries.push(matched(i, src, j, tok));
            i += 1;
            j += 1;
            continue;
        }

        if let Some(hit) = lookahead(source, transformed, i, j, lookahead_window) {
            for (k, skipped) in transformed.iter().enumerate().take(hit).skip(j) {
                entries.push(skipped_entry(k, skipped, tolerated));
            }
            match decorated_run(transformed, hit, source, i) {
                Some(run) => {
                    push_decorated(&mut entries, source, i, run, hit, &transformed[hit]);
                    i += run;
                }
                None => {
                    entries.push(matched(i, src, hit, &transformed[hit]));
                    i += 1;
                }
            }
            j = hit + 1;
            continue;
        }

        entries.push(missing(i, src));
        i += 1;
    }

    for (k, tok) in transformed.iter().enumerate().skip(j) {
        let entry = match tok.construct_category() {
            Some(category) if tolerated.contains(&category) => tolerated_insertion(k, tok, category),
            _ => inserted(k, tok),
        };
        entries.push(entry);
    }

    AlignmentResult {
        entries,
        source_token_count: source.len(),
        transformed_token_count: transformed.len(),
        exempt,
    }
}

/// Index of the first transformed token within the window after `j` that
/// reproduces `source[i]`, unless the divergence is better explained as a
/// deletion of `source[i]`.
fn lookahead(
    source: &[Token],
    transformed: &[Token],
    i: usize,
    j: usize,
    window: usize,
) -> Option<usize> {
    let target = &source[i].normalized;
    let end = j.saturating_add(1).saturating_add(window).min(transformed.len());
    let hit = (j + 1..end).find(|&k| {
        reproduces(&transformed[k], target) || decorated_run(transformed, k, source, i).is_some()
    })?;

    if let Some(current) = comparable(&transformed[j]) {
        let source_end = i.saturating_add(1).saturating_add(window).min(source.len());
        let deletion = (i + 1..source_end).find(|&s| source[s].normalized == current);
        if deletion.is_some_and(|s| s - i < hit - j) {
            return None;
        }
    }
    Some(hit)
}

/// How many source tokens from `i` the words of construct `transformed[k]`
/// reproduce, when they reproduce all of them. A construct immediately
/// followed by the same words in plain text (`**Kerr:** Kerr said`)
/// decorates nothing; the plain words take the match.
fn decorated_run(transformed: &[Token], k: usize, source: &[Token], i: usize) -> Option<usize> {
    let words = transformed[k].construct_words();
    let n = words.len();
    if n == 0 || i + n > source.len() {
        return None;
    }
    let reproduced = source[i..i + n]
        .iter()
        .zip(words)
        .all(|(s, w)| s.normalized == *w);
    let repeated = transformed.len() > k + n
        && transformed[k + 1..=k + n]
            .iter()
            .zip(words)
            .all(|(t, w)| comparable(t) == Some(w.as_str()));
    (reproduced && !repeated).then_some(n)
}

/// One Preserved entry per decorated source word, all pointing at the
/// construct.
fn push_decorated(
    entries: &mut Vec<AlignmentEntry>,
    source: &[Token],
    i: usize,
    run: usize,
    k: usize,
    tok: &Token,
) {
    for (offset, src) in source[i..i + run].iter().enumerate() {
        entries.push(AlignmentEntry::Preserved {
            source: pos(i + offset, src),
            transformed: pos(k, tok),
            word: src.normalized.clone(),
        });
    }
}

fn reproduces(tok: &Token, target: &str) -> bool {
    comparable(tok).is_some_and(|n| n == target)
}

/// The form a token is compared under; constructs never match a word.
fn comparable(tok: &Token) -> Option<&str> {
    match tok.kind {
        TokenKind::Word | TokenKind::Correction { .. } => Some(tok.normalized.as_str()),
        TokenKind::Construct { .. } => None,
    }
}

fn pos(index: usize, tok: &Token) -> Position {
    Position {
        index,
        offset: tok.offset,
    }
}

/// Preserved for a word, Altered for a correction.
fn matched(i: usize, src: &Token, j: usize, tok: &Token) -> AlignmentEntry {
    match &tok.kind {
        TokenKind::Correction {
            original,
            corrected,
        } => AlignmentEntry::Altered {
            source: pos(i, src),
            transformed: pos(j, tok),
            original: original.clone(),
            corrected: corrected.clone(),
        },
        _ => AlignmentEntry::Preserved {
            source: pos(i, src),
            transformed: pos(j, tok),
            word: src.normalized.clone(),
        },
    }
}

fn skipped_entry(k: usize, tok: &Token, tolerated: &BTreeSet<InsertionCategory>) -> AlignmentEntry {
    let category = tok
        .construct_category()
        .unwrap_or(InsertionCategory::Realignment);
    if tolerated.contains(&category) {
        tolerated_insertion(k, tok, category)
    } else {
        inserted(k, tok)
    }
}

fn tolerated_insertion(k: usize, tok: &Token, category: InsertionCategory) -> AlignmentEntry {
    AlignmentEntry::ToleratedInsertion {
        transformed: pos(k, tok),
        category,
        text: tok.surface.clone(),
    }
}

fn inserted(k: usize, tok: &Token) -> AlignmentEntry {
    AlignmentEntry::Inserted {
        transformed: pos(k, tok),
        text: tok.surface.clone(),
    }
}

fn missing(i: usize, src: &Token) -> AlignmentEntry {
    AlignmentEntry::Missing {
        source: pos(i, src),
        word: src.surface.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize::{tokenize_source, tokenize_transformed};
    use fidelity_core::config::AlignmentConfig;

    fn run(source: &str, transformed: &str, tolerated: &BTreeSet<InsertionCategory>) -> AlignmentResult {
        let src = tokenize_source(source, tolerated);
        let tr = tokenize_transformed(transformed, tolerated);
        align(&src.content, &tr, tolerated, 8, src.exempt)
    }

    fn defaults() -> BTreeSet<InsertionCategory> {
        AlignmentConfig::default_tolerated_categories()
    }

    #[test]
    fn identical_streams_are_fully_preserved() {
        let r = run("The cat sat.", "The cat sat.", &defaults());
        assert_eq!(r.preserved_count(), 3);
        assert!(!r.has_violations());
    }

    #[test]
    fn deleted_word_is_missing() {
        let r = run("The cat sat on the mat.", "The sat on the mat.", &defaults());
        assert_eq!(r.missing_count(), 1);
        assert!(matches!(&r.entries[1], AlignmentEntry::Missing { word, .. } if word == "cat"));
    }

    #[test]
    fn leading_deletion_does_not_cascade() {
        let r = run("the cat sat on the mat", "cat sat on the mat", &defaults());
        assert_eq!(r.missing_count(), 1);
        assert_eq!(r.preserved_count(), 5);
        assert_eq!(r.tolerated_count(), 0);
    }

    #[test]
    fn inserted_word_is_realignment_by_default() {
        let r = run("The cat sat", "The big cat sat", &defaults());
        assert!(!r.has_violations());
        assert!(r.entries.iter().any(|e| matches!(
            e,
            AlignmentEntry::ToleratedInsertion { category: InsertionCategory::Realignment, text, .. } if text == "big"
        )));
    }

    #[test]
    fn inserted_word_is_a_violation_in_strict_mode() {
        let mut strict = defaults();
        strict.remove(&InsertionCategory::Realignment);
        let r = run("The cat sat", "The big cat sat", &strict);
        assert_eq!(r.inserted_count(), 1);
    }

    #[test]
    fn trailing_words_are_inserted() {
        let r = run("The cat", "The cat sat down", &defaults());
        assert_eq!(r.inserted_count(), 2);
        assert_eq!(r.preserved_count(), 2);
    }

    #[test]
    fn correction_is_altered() {
        let r = run("teh cat", "teh [sic] (the) cat", &defaults());
        assert_eq!(r.altered_count(), 1);
        assert_eq!(r.preserved_count(), 1);
        assert!((r.preservation_ratio() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn lookahead_zero_never_realigns() {
        let tolerated = defaults();
        let src = tokenize_source("The cat sat", &tolerated);
        let tr = tokenize_transformed("The big cat sat", &tolerated);
        let r = align(&src.content, &tr, &tolerated, 0, src.exempt);
        assert!(r.missing_count() > 0);
    }

    #[test]
    fn every_source_token_is_accounted_for_once() {
        let r = run(
            "one two three four five six",
            "## Title\none three two five seven six",
            &defaults(),
        );
        let mut seen: Vec<usize> = r.entries.iter().filter_map(|e| e.source()).map(|p| p.index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..6).collect::<Vec<_>>());
    }

    #[test]
    fn bolded_label_reproducing_source_words_is_preserved() {
        let r = run("Host: Welcome back everyone.", "**Host:** Welcome back everyone.", &defaults());
        assert_eq!(r.preserved_count(), 4);
        assert_eq!(r.tolerated_count(), 0);
        assert!(!r.has_violations());
    }

    #[test]
    fn sentence_promoted_to_heading_is_preserved() {
        let r = run(
            "Welcome to the show. We talk about rust.",
            "## Welcome to the show\n\nWe talk about rust.",
            &defaults(),
        );
        assert_eq!(r.missing_count(), 0);
        assert_eq!(r.preserved_count(), 8);
        let heading_hits = r
            .entries
            .iter()
            .filter(|e| matches!(e, AlignmentEntry::Preserved { transformed, .. } if transformed.index == 0))
            .count();
        assert_eq!(heading_hits, 4);
    }

    #[test]
    fn promoted_heading_is_preserved_in_strict_mode() {
        let r = run(
            "Welcome to the show. We talk about rust.",
            "## Welcome to the show\n\nWe talk about rust.",
            &BTreeSet::new(),
        );
        assert!(!r.has_violations());
    }

    #[test]
    fn label_repeated_in_body_stays_an_insertion() {
        let r = run("Dr. Kerr explained.", "**Dr. Kerr:** Dr. Kerr explained.", &defaults());
        assert_eq!(r.preserved_count(), 3);
        assert_eq!(r.tolerated_count(), 1);
    }

    #[test]
    fn heading_reached_through_lookahead_is_preserved() {
        let r = run(
            "Intro to rust. Rust is fast.",
            "Preface.\n\n# Intro to rust\n\nRust is fast.",
            &defaults(),
        );
        assert_eq!(r.missing_count(), 0);
        assert_eq!(r.preserved_count(), 6);
        assert_eq!(r.tolerated_count(), 1);
    }
}
