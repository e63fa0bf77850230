//! Bounded evidence snippets for findings.

use fidelity_core::models::Token;

/// Longest run of flagged tokens reproduced verbatim in a snippet.
const MAX_MARKED_TOKENS: usize = 24;

/// Source text around the byte range `[start, end)`, with up to `context`
/// bytes on either side. Newlines are flattened and cut edges marked
/// with `...`.
pub(crate) fn excerpt(text: &str, start: usize, end: usize, context: usize) -> String {
    let ctx_start = snap_to_char_boundary(text, start.saturating_sub(context), false);
    let ctx_end = snap_to_char_boundary(text, end.saturating_add(context), true);

    let snippet = text[ctx_start..ctx_end].replace('\n', " ");
    let prefix = if ctx_start > 0 { "..." } else { "" };
    let suffix = if ctx_end < text.len() { "..." } else { "" };
    format!("{prefix}{snippet}{suffix}")
}

/// Surface tokens `[first, last]` of `tokens` wrapped in `>>` `<<`, with
/// `context` tokens on either side.
pub(crate) fn token_window(tokens: &[Token], first: usize, last: usize, context: usize) -> String {
    let lo = first.saturating_sub(context);
    let hi = last.saturating_add(context).saturating_add(1).min(tokens.len());
    let mut out = String::new();
    if lo > 0 {
        out.push_str("... ");
    }
    out.push_str(&join_surfaces(&tokens[lo..first]));
    if lo < first {
        out.push(' ');
    }
    out.push_str(">>");
    out.push_str(&marked(&tokens[first..=last.min(tokens.len().saturating_sub(1))]));
    out.push_str("<<");
    if last + 1 < hi {
        out.push(' ');
        out.push_str(&join_surfaces(&tokens[last + 1..hi]));
    }
    if hi < tokens.len() {
        out.push_str(" ...");
    }
    out
}

/// Flagged surfaces, elided in the middle past [`MAX_MARKED_TOKENS`].
pub(crate) fn marked(tokens: &[Token]) -> String {
    if tokens.len() <= MAX_MARKED_TOKENS {
        return join_surfaces(tokens);
    }
    let half = MAX_MARKED_TOKENS / 2;
    format!(
        "{} ... [{} more] ... {}",
        join_surfaces(&tokens[..half]),
        tokens.len() - MAX_MARKED_TOKENS,
        join_surfaces(&tokens[tokens.len() - half..])
    )
}

fn join_surfaces(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.surface.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Snap a byte offset to a valid char boundary.
/// If `forward` is true, snap forward; otherwise snap backward.
fn snap_to_char_boundary(text: &str, pos: usize, forward: bool) -> usize {
    if pos >= text.len() {
        return text.len();
    }
    let mut p = pos;
    while !text.is_char_boundary(p) {
        if forward {
            p += 1;
        } else {
            p -= 1;
        }
    }
    p
}
