//! Splitting documents into comparable token streams.
//!
//! Word tokens are maximal runs of non-whitespace whose normalized form is
//! non-empty. Constructs of a tolerated category are recognized first and
//! kept as one atomic token each, so `**Dr. Kerr:**` is never split into
//! stray words. Headings and labels remember the words they decorate.

mod patterns;

use std::collections::BTreeSet;

use fidelity_core::models::{InsertionCategory, Token, TokenKind};

use crate::normalize::normalize;
use patterns::Span;

/// A source document split into its content stream and the tolerated
/// constructs excluded from it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceTokens {
    pub content: Vec<Token>,
    pub exempt: Vec<Token>,
}

/// Tokenize a source document. Constructs of a tolerated category are
/// exempt: they have no obligation to reappear.
pub fn tokenize_source(text: &str, tolerated: &BTreeSet<InsertionCategory>) -> SourceTokens {
    let mut content = Vec::new();
    let mut exempt = Vec::new();
    for token in tokenize_with(text, tolerated, false) {
        if token.is_word() {
            content.push(token);
        } else {
            exempt.push(token);
        }
    }
    SourceTokens { content, exempt }
}

/// Tokenize a transformed document. Tolerated constructs and inline
/// corrections become atomic tokens; everything else is words.
pub fn tokenize_transformed(text: &str, tolerated: &BTreeSet<InsertionCategory>) -> Vec<Token> {
    tokenize_with(text, tolerated, true)
}

/// Plain word tokens, no construct recognition.
pub fn tokenize_words(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    push_words(&mut tokens, text, 0);
    tokens
}

fn tokenize_with(
    text: &str,
    tolerated: &BTreeSet<InsertionCategory>,
    corrections: bool,
) -> Vec<Token> {
    let spans = patterns::find_spans(text, tolerated.iter(), corrections);
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for span in spans {
        push_words(&mut tokens, &text[cursor..span.start()], cursor);
        let surface = &text[span.start()..span.end()];
        let token = match span {
            Span::Construct { start, category, .. } => Token {
                normalized: String::new(),
                surface: surface.to_string(),
                offset: start,
                kind: TokenKind::Construct {
                    category,
                    words: decorated_words(surface, category),
                },
            },
            Span::Correction {
                start,
                original,
                corrected,
                ..
            } => Token {
                normalized: normalize(&original),
                surface: surface.to_string(),
                offset: start,
                kind: TokenKind::Correction {
                    original,
                    corrected,
                },
            },
        };
        cursor = token.end();
        tokens.push(token);
    }
    push_words(&mut tokens, &text[cursor..], cursor);
    tokens
}

/// Normalized words carried by a heading or speaker label, so the aligner
/// can still credit them to the source. Other constructs carry none.
fn decorated_words(surface: &str, category: InsertionCategory) -> Vec<String> {
    let inner = match category {
        InsertionCategory::Heading => surface.trim_start().trim_start_matches('#'),
        InsertionCategory::SpeakerLabel => surface,
        _ => return Vec::new(),
    };
    tokenize_words(inner)
        .into_iter()
        .map(|t| t.normalized)
        .collect()
}

/// Append the word tokens of `segment`, which starts at byte `base` of the
/// full text.
fn push_words(tokens: &mut Vec<Token>, segment: &str, base: usize) {
    let mut start: Option<usize> = None;
    for (idx, ch) in segment.char_indices() {
        match (ch.is_whitespace(), start) {
            (true, Some(s)) => {
                push_word(tokens, &segment[s..idx], base + s);
                start = None;
            }
            (false, None) => start = Some(idx),
            _ => {}
        }
    }
    if let Some(s) = start {
        push_word(tokens, &segment[s..], base + s);
    }
}

fn push_word(tokens: &mut Vec<Token>, surface: &str, offset: usize) {
    let normalized = normalize(surface);
    if !normalized.is_empty() {
        tokens.push(Token::word(normalized, surface, offset));
    }
}
