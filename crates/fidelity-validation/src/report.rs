//! Per-checker reports and the combined review report.
//!
//! Reports are bounded: they carry counts, verdicts and short evidence
//! snippets, never a full dump of either document. The full alignment is
//! available on [`AlignmentReport::result`] for library callers but is not
//! serialized.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use fidelity_core::models::{
    AlignmentResult, MatchResult, OracleCallStats, QualityAssessment, RefinementSession,
    RefinementVerdict, Verdict,
};

use crate::engine::ReviewMode;

/// What a finding is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Source content with no counterpart in the transformed document.
    MissingContent,
    /// Transformed content nothing in the source explains.
    InsertedContent,
    /// A claimed quote and its best source match.
    QuoteMatch,
    /// A rubric dimension below target.
    QualityDimension,
}

/// One reviewable item, with the evidence behind its verdict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub verdict: Verdict,
    /// Short description of the item.
    pub subject: String,
    /// Bounded excerpt locating the item.
    pub evidence: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Byte offset of the item in the document the evidence is from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

/// Word-preservation check result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignmentReport {
    pub verdict: Verdict,
    pub passed: bool,
    pub preservation_ratio: f64,
    pub source_tokens: usize,
    pub transformed_tokens: usize,
    pub preserved: usize,
    pub altered: usize,
    pub missing: usize,
    pub inserted: usize,
    pub tolerated: usize,
    pub exempt: usize,
    pub findings: Vec<Finding>,
    #[serde(skip)]
    pub result: AlignmentResult,
}

/// One quote's match, as reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteFinding {
    pub verdict: Verdict,
    #[serde(flatten)]
    pub result: MatchResult,
    /// Source context around the matched span; empty when there is none.
    pub evidence: String,
}

/// Fuzzy quote check result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteReport {
    pub verdict: Verdict,
    pub passed: bool,
    /// Grounded (Exact + FuzzyMatch) quotes over all quotes; 1.0 with none.
    pub grounded_ratio: f64,
    pub threshold: f64,
    pub quotes: Vec<QuoteFinding>,
}

impl QuoteReport {
    pub fn grounded_count(&self) -> usize {
        self.quotes
            .iter()
            .filter(|q| q.result.status.is_grounded())
            .count()
    }
}

/// Quality refinement result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefinementReport {
    pub verdict: Verdict,
    pub passed: bool,
    pub outcome: RefinementVerdict,
    pub oracle: String,
    pub target_aggregate: f64,
    pub iterations: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_aggregate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_aggregate: Option<f64>,
    pub assessments: Vec<QualityAssessment>,
    pub stats: OracleCallStats,
    /// Dimensions of the final assessment still below target.
    pub findings: Vec<Finding>,
    /// Whether the last scored draft differs from the one submitted.
    pub revised: bool,
    #[serde(skip)]
    pub session: RefinementSession,
}

impl RefinementReport {
    /// The draft that was scored last.
    pub fn final_draft(&self) -> &str {
        self.session.final_draft()
    }
}

/// Combined outcome of one review.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FidelityReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub mode: ReviewMode,
    /// BLAKE3 digest of the source document.
    pub source_digest: String,
    pub verdict: Verdict,
    pub passed: bool,
    pub alignment: AlignmentReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quotes: Option<QuoteReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refinement: Option<RefinementReport>,
}

impl FidelityReport {
    /// Every finding across checkers, quotes included, worst first.
    pub fn findings(&self) -> Vec<(FindingKind, Verdict, &str)> {
        let mut all: Vec<(FindingKind, Verdict, &str)> = self
            .alignment
            .findings
            .iter()
            .map(|f| (f.kind, f.verdict, f.subject.as_str()))
            .collect();
        if let Some(quotes) = &self.quotes {
            all.extend(
                quotes
                    .quotes
                    .iter()
                    .map(|q| (FindingKind::QuoteMatch, q.verdict, q.result.quote.text.as_str())),
            );
        }
        if let Some(refinement) = &self.refinement {
            all.extend(
                refinement
                    .findings
                    .iter()
                    .map(|f| (f.kind, f.verdict, f.subject.as_str())),
            );
        }
        all.sort_by(|a, b| b.1.cmp(&a.1));
        all
    }

    /// Short multi-line human summary.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{} ({}) run {}\n  alignment: {} preserved {:.1}%, {} missing, {} inserted, {} tolerated",
            self.verdict,
            if self.passed { "pass" } else { "fail" },
            self.run_id,
            self.alignment.verdict,
            self.alignment.preservation_ratio * 100.0,
            self.alignment.missing,
            self.alignment.inserted,
            self.alignment.tolerated,
        );
        if let Some(q) = &self.quotes {
            out.push_str(&format!(
                "\n  quotes: {} grounded {}/{} ({:.0}%)",
                q.verdict,
                q.grounded_count(),
                q.quotes.len(),
                q.grounded_ratio * 100.0
            ));
        }
        if let Some(r) = &self.refinement {
            let aggregate = r
                .final_aggregate
                .map(|a| format!("{a:.2}"))
                .unwrap_or_else(|| "n/a".to_string());
            out.push_str(&format!(
                "\n  quality: {} aggregate {} / target {:.2} after {} iteration(s)",
                r.verdict, aggregate, r.target_aggregate, r.iterations
            ));
        }
        out
    }
}
