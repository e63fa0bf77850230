//! Recognizers for constructs kept atomic during tokenization.

use fidelity_core::InsertionCategory;
use regex::Regex;
use std::sync::LazyLock;

/// ATX heading line: `## Title`.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]+[^\n]*$").unwrap());

/// Bold speaker label: `**Dr. Kerr:**`, `**Dr. Kerr**:` or `__Host:__`.
static SPEAKER_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\*\*[^*\n]{1,60}?:\*\*|\*\*[^*\n]{1,60}?\*\*:|__[^_\n]{1,60}?:__").unwrap()
});

/// List bullets, ordered-list numerals, blockquote markers and rules.
/// Only the `m` group is the construct; trailing blanks are not.
static STRUCTURAL_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?P<m>[-*+]|\d{1,3}[.)])[ \t]|^[ \t]*(?P<q>>+)|^[ \t]*(?P<r>-{3,}|\*{3,}|_{3,})[ \t]*$",
    )
    .unwrap()
});

/// `[00:12]`, `(1:02:33)` or a bare `01:02:33`.
static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\d{1,2}:\d{2}(?::\d{2})?\]|\(\d{1,2}:\d{2}(?::\d{2})?\)|\b\d{1,2}:\d{2}:\d{2}\b")
        .unwrap()
});

/// Bracketed non-speech annotation: `[Applause]`, `[inaudible]`.
static ANNOTATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[A-Za-z][^\[\]\n]{0,48}\]").unwrap());

/// Inline correction: `original [sic] (corrected)`.
static CORRECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?P<orig>[^\s\[\]()]+)[ \t]+(?i:\[sic\])[ \t]+\((?P<corr>[^()\n]{1,80})\)").unwrap()
});

/// A recognized construct span in the input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Span {
    Construct {
        start: usize,
        end: usize,
        category: InsertionCategory,
    },
    Correction {
        start: usize,
        end: usize,
        original: String,
        corrected: String,
    },
}

impl Span {
    pub(crate) fn start(&self) -> usize {
        match self {
            Self::Construct { start, .. } | Self::Correction { start, .. } => *start,
        }
    }

    pub(crate) fn end(&self) -> usize {
        match self {
            Self::Construct { end, .. } | Self::Correction { end, .. } => *end,
        }
    }

    /// Corrections win over constructs starting at the same byte.
    fn priority(&self) -> u8 {
        match self {
            Self::Correction { .. } => 0,
            Self::Construct { .. } => 1,
        }
    }
}

/// Every construct of the given categories, plus corrections when asked,
/// sorted by start and with overlaps removed (earliest start wins, then
/// corrections, then the longest span).
pub(crate) fn find_spans<'a>(
    text: &str,
    categories: impl IntoIterator<Item = &'a InsertionCategory>,
    corrections: bool,
) -> Vec<Span> {
    let mut spans = Vec::new();

    for &category in categories {
        match category {
            InsertionCategory::Heading => push_matches(&mut spans, &HEADING_RE, text, category),
            InsertionCategory::SpeakerLabel => {
                push_matches(&mut spans, &SPEAKER_LABEL_RE, text, category)
            }
            InsertionCategory::Timestamp => push_matches(&mut spans, &TIMESTAMP_RE, text, category),
            InsertionCategory::Annotation => {
                push_matches(&mut spans, &ANNOTATION_RE, text, category)
            }
            InsertionCategory::StructuralMarker => {
                for caps in STRUCTURAL_MARKER_RE.captures_iter(text) {
                    let marker = caps.name("m").or(caps.name("q")).or(caps.name("r"));
                    if let Some(m) = marker {
                        spans.push(Span::Construct {
                            start: m.start(),
                            end: m.end(),
                            category,
                        });
                    }
                }
            }
            // Realignment is a verdict on word tokens, not a textual construct.
            InsertionCategory::Realignment => {}
        }
    }

    if corrections {
        for caps in CORRECTION_RE.captures_iter(text) {
            let (Some(whole), Some(orig), Some(corr)) = (caps.get(0), caps.name("orig"), caps.name("corr"))
            else {
                continue;
            };
            spans.push(Span::Correction {
                start: whole.start(),
                end: whole.end(),
                original: orig.as_str().to_string(),
                corrected: corr.as_str().trim().to_string(),
            });
        }
    }

    spans.sort_by(|a, b| {
        a.start()
            .cmp(&b.start())
            .then(a.priority().cmp(&b.priority()))
            .then(b.end().cmp(&a.end()))
    });

    let mut kept: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if kept.last().is_some_and(|last| span.start() < last.end()) {
            continue;
        }
        kept.push(span);
    }
    kept
}

fn push_matches(spans: &mut Vec<Span>, re: &Regex, text: &str, category: InsertionCategory) {
    spans.extend(re.find_iter(text).map(|m| Span::Construct {
        start: m.start(),
        end: m.end(),
        category,
    }));
}
