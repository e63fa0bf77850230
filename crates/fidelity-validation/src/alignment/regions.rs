//! Grouping alignment violations into reviewable findings.

use fidelity_core::models::{AlignmentEntry, InsertionCategory, Token, Verdict};

use crate::evidence::{marked, token_window};
use crate::report::{Finding, FindingKind};

/// A maximal run of consecutive Missing or Inserted entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DivergenceRegion {
    pub kind: RegionKind,
    /// Entry index range, inclusive.
    pub first_entry: usize,
    pub last_entry: usize,
    /// Whether the adjacent entries make this a substitution rather than a
    /// pure loss or pure insertion.
    pub ambiguous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    Missing,
    Inserted,
}

/// Find every divergence region. A Missing run next to unexplained
/// transformed content (Inserted, or a Realignment) is ambiguous, and so is
/// an Inserted run next to Missing content.
pub fn divergence_regions(entries: &[AlignmentEntry]) -> Vec<DivergenceRegion> {
    let mut regions = Vec::new();
    let mut idx = 0;
    while idx < entries.len() {
        let kind = match entries[idx] {
            AlignmentEntry::Missing { .. } => RegionKind::Missing,
            AlignmentEntry::Inserted { .. } => RegionKind::Inserted,
            _ => {
                idx += 1;
                continue;
            }
        };
        let first = idx;
        while idx + 1 < entries.len() && region_kind(&entries[idx + 1]) == Some(kind) {
            idx += 1;
        }
        let last = idx;
        regions.push(DivergenceRegion {
            kind,
            first_entry: first,
            last_entry: last,
            ambiguous: neighbours(entries, first, last).any(|e| explains(kind, e)),
        });
        idx += 1;
    }
    regions
}

fn region_kind(entry: &AlignmentEntry) -> Option<RegionKind> {
    match entry {
        AlignmentEntry::Missing { .. } => Some(RegionKind::Missing),
        AlignmentEntry::Inserted { .. } => Some(RegionKind::Inserted),
        _ => None,
    }
}

/// Entries adjacent to `[first, last]` up to the nearest anchored match
/// (Preserved or Altered) on either side.
fn neighbours(
    entries: &[AlignmentEntry],
    first: usize,
    last: usize,
) -> impl Iterator<Item = &AlignmentEntry> {
    let anchored = |e: &&AlignmentEntry| {
        !matches!(
            e,
            AlignmentEntry::Preserved { .. } | AlignmentEntry::Altered { .. }
        )
    };
    let before = entries[..first].iter().rev().take_while(anchored);
    let after = entries[last + 1..].iter().take_while(anchored);
    before.chain(after)
}

fn explains(kind: RegionKind, neighbour: &AlignmentEntry) -> bool {
    match kind {
        RegionKind::Missing => matches!(
            neighbour,
            AlignmentEntry::Inserted { .. }
                | AlignmentEntry::ToleratedInsertion {
                    category: InsertionCategory::Realignment,
                    ..
                }
        ),
        RegionKind::Inserted => matches!(neighbour, AlignmentEntry::Missing { .. }),
    }
}

/// Findings for every region, with evidence drawn from the token stream
/// the region belongs to. `loss_tolerated` downgrades unambiguous Missing
/// regions to Unclear when the preservation ratio still passes.
pub fn region_findings(
    entries: &[AlignmentEntry],
    source: &[Token],
    transformed: &[Token],
    context_tokens: usize,
    loss_tolerated: bool,
) -> Vec<Finding> {
    divergence_regions(entries)
        .into_iter()
        .filter_map(|region| {
            let span = &entries[region.first_entry..=region.last_entry];
            let (kind, tokens, first, last) = match region.kind {
                RegionKind::Missing => (
                    FindingKind::MissingContent,
                    source,
                    span.first()?.source()?.index,
                    span.last()?.source()?.index,
                ),
                RegionKind::Inserted => (
                    FindingKind::InsertedContent,
                    transformed,
                    span.first()?.transformed()?.index,
                    span.last()?.transformed()?.index,
                ),
            };
            let verdict = if region.ambiguous
                || (loss_tolerated && region.kind == RegionKind::Missing)
            {
                Verdict::Unclear
            } else {
                Verdict::Deny
            };
            let count = last - first + 1;
            let label = match region.kind {
                RegionKind::Missing => "missing",
                RegionKind::Inserted => "inserted",
            };
            Some(Finding {
                kind,
                verdict,
                subject: format!("{count} {label} word(s): {}", marked(&tokens[first..=last])),
                evidence: token_window(tokens, first, last, context_tokens),
                score: None,
                offset: Some(tokens[first].offset),
            })
        })
        .collect()
}
