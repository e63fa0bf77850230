//! Best-window search of a quote in a source document.

use fidelity_core::constants::{EXACT_MATCH_RATIO, WINDOW_MAX_FACTOR, WINDOW_MIN_FACTOR};
use fidelity_core::models::{MatchResult, MatchStatus, Quote, SourceSpan, Token};

use super::similarity::{ratio_from_lcs, LcsPattern};
use crate::tokenize::tokenize_words;

/// A source document tokenized once and shared by every quote matched
/// against it.
#[derive(Debug, Clone)]
pub struct SourceIndex<'a> {
    text: &'a str,
    tokens: Vec<Token>,
    /// Normalized tokens joined by single spaces.
    joined: Vec<char>,
    /// Char offset of each token in `joined`, plus a sentinel.
    starts: Vec<usize>,
}

impl<'a> SourceIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let tokens = tokenize_words(text);
        let mut joined = Vec::new();
        let mut starts = Vec::with_capacity(tokens.len() + 1);
        for (k, token) in tokens.iter().enumerate() {
            if k > 0 {
                joined.push(' ');
            }
            starts.push(joined.len());
            joined.extend(token.normalized.chars());
        }
        starts.push(joined.len() + 1);
        Self {
            text,
            tokens,
            joined,
            starts,
        }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Joined normalized characters of tokens `[start, end)`.
    fn window(&self, start: usize, end: usize) -> &[char] {
        // starts[end] - 1 drops the separator before token `end`.
        &self.joined[self.starts[start]..self.starts[end] - 1]
    }

    fn span(&self, start: usize, end: usize) -> SourceSpan {
        let start_offset = self.tokens[start].offset;
        let end_offset = self.tokens[end - 1].end();
        SourceSpan {
            start_token: start,
            end_token: end,
            start_offset,
            end_offset,
            text: self.text[start_offset..end_offset].to_string(),
        }
    }
}

/// Locate `quote` in `source` and classify the best match.
pub fn match_quote(quote: &Quote, source: &str, threshold: f64) -> MatchResult {
    match_in_index(quote, &SourceIndex::new(source), threshold)
}

/// Same as [`match_quote`] against a prebuilt index.
///
/// Windows of `floor(0.8q)..=ceil(1.25q)` source tokens are compared with
/// the quote's normalized text; the highest ratio wins, the earliest
/// window on a tie. An exact token run short-circuits the search.
///
/// Every window is scored exactly. One bit-parallel LCS pass per start
/// token yields the ratio of all window lengths at that start, so a quote
/// costs `O(n * w * ceil(c / 64))` for `w` chars in the longest window
/// and `c` chars in the quote.
pub fn match_in_index(quote: &Quote, index: &SourceIndex<'_>, threshold: f64) -> MatchResult {
    let quote_tokens = tokenize_words(&quote.text);
    let q = quote_tokens.len();
    let n = index.tokens.len();
    if q == 0 || n == 0 {
        return MatchResult {
            quote: quote.clone(),
            span: None,
            ratio: 0.0,
            status: MatchStatus::Mismatch,
        };
    }

    if let Some(start) = exact_run(&quote_tokens, &index.tokens) {
        return MatchResult {
            quote: quote.clone(),
            span: Some(index.span(start, start + q)),
            ratio: 1.0,
            status: MatchStatus::Exact,
        };
    }

    let quote_chars: Vec<char> = quote_tokens
        .iter()
        .map(|t| t.normalized.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .collect();
    let pattern = LcsPattern::new(&quote_chars);
    let rows: Vec<Option<usize>> = index.joined.iter().map(|&c| pattern.row(c)).collect();
    let mut scanner = pattern.scanner();

    let (min_len, max_len) = window_bounds(q, n);
    let mut best_ratio = -1.0f64;
    let mut best = (0usize, min_len);

    for start in 0..=n - min_len {
        scanner.reset();
        let first = index.starts[start];
        let mut pos = first;
        for end in start + 1..=(start + max_len).min(n) {
            // starts[end] - 1 is the separator before token `end`.
            let stop = index.starts[end] - 1;
            for &row in &rows[pos..stop] {
                scanner.push(row);
            }
            pos = stop;
            if end - start < min_len {
                continue;
            }
            let ratio = ratio_from_lcs(scanner.lcs(), pattern.len(), stop - first);
            if ratio > best_ratio {
                best_ratio = ratio;
                best = (start, end);
            }
        }
    }

    let ratio = best_ratio.max(0.0);
    MatchResult {
        quote: quote.clone(),
        span: Some(index.span(best.0, best.1)),
        ratio,
        status: classify(ratio, threshold),
    }
}

/// Exact when `ratio >= 0.98`, FuzzyMatch when `ratio >= threshold`,
/// Mismatch otherwise.
pub fn classify(ratio: f64, threshold: f64) -> MatchStatus {
    if ratio >= EXACT_MATCH_RATIO {
        MatchStatus::Exact
    } else if ratio >= threshold {
        MatchStatus::FuzzyMatch
    } else {
        MatchStatus::Mismatch
    }
}

/// Window lengths for a quote of `q` tokens in a source of `n` tokens.
fn window_bounds(q: usize, n: usize) -> (usize, usize) {
    let min_len = ((q as f64 * WINDOW_MIN_FACTOR).floor() as usize).max(1).min(n);
    let max_len = ((q as f64 * WINDOW_MAX_FACTOR).ceil() as usize).clamp(min_len, n);
    (min_len, max_len)
}

fn exact_run(quote: &[Token], source: &[Token]) -> Option<usize> {
    if quote.len() > source.len() {
        return None;
    }
    source
        .windows(quote.len())
        .position(|w| w.iter().zip(quote).all(|(s, q)| s.normalized == q.normalized))
}
