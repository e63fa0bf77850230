//! Iterative quality refinement against an external oracle.

mod feedback;
mod refiner;
mod retry;

pub use feedback::revision_instruction;
pub use refiner::{refine, QualityRefiner};

use fidelity_core::models::{RefinementSession, RefinementVerdict, Verdict};

use crate::report::{Finding, FindingKind, RefinementReport};

/// Longest oracle rationale quoted as evidence.
const MAX_RATIONALE_CHARS: usize = 240;

/// Accepted confirms, Exhausted denies, anything that left quality
/// unknown is Unclear.
pub fn refinement_verdict(outcome: &RefinementVerdict) -> Verdict {
    match outcome {
        RefinementVerdict::Accepted { .. } => Verdict::Confirm,
        RefinementVerdict::Exhausted => Verdict::Deny,
        RefinementVerdict::Inconclusive { .. } | RefinementVerdict::Cancelled { .. } => {
            Verdict::Unclear
        }
    }
}

/// Summarize a finished session. Unless the session was accepted, each
/// dimension of its last assessment still below target is a finding.
pub fn build_report(
    session: RefinementSession,
    oracle: &str,
    initial_draft: &str,
) -> RefinementReport {
    let verdict = refinement_verdict(session.verdict());
    let target = session.target_aggregate();

    let findings = match (session.verdict(), session.last_assessment()) {
        (RefinementVerdict::Accepted { .. }, _) | (_, None) => Vec::new(),
        (_, Some(last)) => last
            .dimensions()
            .iter()
            .filter(|d| d.score() < target)
            .map(|d| Finding {
                kind: FindingKind::QualityDimension,
                verdict,
                subject: d.name().to_string(),
                evidence: d.rationale().chars().take(MAX_RATIONALE_CHARS).collect(),
                score: Some(d.score()),
                offset: None,
            })
            .collect(),
    };

    RefinementReport {
        verdict,
        passed: session.verdict().is_accepted(),
        outcome: session.verdict().clone(),
        oracle: oracle.to_string(),
        target_aggregate: target,
        iterations: session.assessments().len(),
        final_aggregate: session.last_assessment().map(|a| a.aggregate()),
        best_aggregate: session.best_assessment().map(|a| a.aggregate()),
        assessments: session.assessments().to_vec(),
        stats: session.stats(),
        findings,
        revised: session.final_draft() != initial_draft,
        session,
    }
}
