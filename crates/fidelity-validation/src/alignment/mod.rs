//! Word-preservation checking.
//!
//! Tokenizes both documents, aligns them with [`align`], and condenses the
//! alignment into an [`AlignmentReport`].

mod aligner;
mod regions;

pub use aligner::align;
pub use regions::{divergence_regions, region_findings, DivergenceRegion, RegionKind};

use fidelity_core::config::AlignmentConfig;
use fidelity_core::errors::InputError;
use fidelity_core::models::{AlignmentResult, Verdict};
use fidelity_core::FidelityResult;
use tracing::{debug, info};

use crate::report::AlignmentReport;
use crate::tokenize::{tokenize_source, tokenize_transformed};

/// Aligns a transformed document against its source under one
/// [`AlignmentConfig`].
#[derive(Debug, Clone)]
pub struct SequenceAligner {
    config: AlignmentConfig,
}

impl SequenceAligner {
    pub fn new(config: AlignmentConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlignmentConfig {
        &self.config
    }

    /// Align two documents. Fails on an empty or whitespace-only document.
    pub fn align(&self, source: &str, transformed: &str) -> FidelityResult<AlignmentResult> {
        Ok(self.check(source, transformed)?.result)
    }

    /// Align two documents and grade the result.
    pub fn check(&self, source: &str, transformed: &str) -> FidelityResult<AlignmentReport> {
        require_text("source", source)?;
        require_text("transformed", transformed)?;

        let tolerated = &self.config.tolerated_categories;
        let src = tokenize_source(source, tolerated);
        let tr = tokenize_transformed(transformed, tolerated);
        if src.content.is_empty() {
            return Err(InputError::malformed("source", "no word tokens").into());
        }

        let span = fidelity_core::alignment_span!(src.content.len(), tr.len());
        let _guard = span.enter();

        let result = align(
            &src.content,
            &tr,
            tolerated,
            self.config.lookahead_window,
            src.exempt,
        );

        let ratio = result.preservation_ratio();
        let missing = result.missing_count();
        let inserted = result.inserted_count();
        let passed =
            inserted == 0 && (missing == 0 || ratio >= self.config.min_preservation_ratio);

        let findings = region_findings(
            &result.entries,
            &src.content,
            &tr,
            self.config.evidence_context_tokens,
            passed,
        );
        for finding in &findings {
            debug!(verdict = %finding.verdict, subject = %finding.subject, "alignment finding");
        }
        let verdict = Verdict::worst(findings.iter().map(|f| f.verdict));

        info!(
            preserved = result.preserved_count(),
            altered = result.altered_count(),
            missing,
            inserted,
            ratio,
            passed,
            "alignment complete"
        );

        Ok(AlignmentReport {
            verdict,
            passed,
            preservation_ratio: ratio,
            source_tokens: result.source_token_count,
            transformed_tokens: result.transformed_token_count,
            preserved: result.preserved_count(),
            altered: result.altered_count(),
            missing,
            inserted,
            tolerated: result.tolerated_count(),
            exempt: result.exempt.len(),
            findings,
            result,
        })
    }
}

fn require_text(field: &str, text: &str) -> Result<(), InputError> {
    if text.trim().is_empty() {
        return Err(InputError::empty(field));
    }
    Ok(())
}
