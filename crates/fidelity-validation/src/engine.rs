//! FidelityEngine: runs the checkers a review mode selects and combines
//! their verdicts.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use fidelity_core::config::FidelityConfig;
use fidelity_core::errors::{InputError, OracleError};
use fidelity_core::models::{Quote, Rubric, Verdict};
use fidelity_core::traits::Cancellable;
use fidelity_core::{CancellationToken, FidelityResult, IQualityOracle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::alignment::SequenceAligner;
use crate::quotes::QuoteMatcher;
use crate::refinement::{build_report, QualityRefiner};
use crate::report::{AlignmentReport, FidelityReport, QuoteReport, RefinementReport};

/// Which checkers a review runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewMode {
    /// Word-preservation alignment only.
    FormatOnly,
    /// Alignment, quote grounding, and one scoring pass of the draft.
    SemanticSinglePass,
    /// Alignment, quote grounding, and the full refinement loop.
    SemanticAllClaims,
}

impl ReviewMode {
    pub const ALL: [ReviewMode; 3] = [
        Self::FormatOnly,
        Self::SemanticSinglePass,
        Self::SemanticAllClaims,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FormatOnly => "format-only",
            Self::SemanticSinglePass => "semantic-single-pass",
            Self::SemanticAllClaims => "semantic-all-claims",
        }
    }

    pub fn is_semantic(&self) -> bool {
        !matches!(self, Self::FormatOnly)
    }
}

impl fmt::Display for ReviewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown review mode '{s}'"))
    }
}

/// Everything one review needs. Immutable for the duration of the review.
#[derive(Clone, Copy)]
pub struct ReviewContext<'a> {
    pub mode: ReviewMode,
    pub source: &'a str,
    pub transformed: &'a str,
    /// Claimed excerpts to ground; may be empty.
    pub quotes: &'a [Quote],
    /// Abstractive draft to score, if any.
    pub draft: Option<&'a str>,
    /// Rubric for the draft; the default summary rubric when `None`.
    pub rubric: Option<&'a Rubric>,
    pub oracle: Option<&'a dyn IQualityOracle>,
    pub cancel: Option<&'a CancellationToken>,
}

impl<'a> ReviewContext<'a> {
    /// A context with no quotes, draft, oracle or cancellation.
    pub fn new(mode: ReviewMode, source: &'a str, transformed: &'a str) -> Self {
        Self {
            mode,
            source,
            transformed,
            quotes: &[],
            draft: None,
            rubric: None,
            oracle: None,
            cancel: None,
        }
    }

    pub fn with_quotes(mut self, quotes: &'a [Quote]) -> Self {
        self.quotes = quotes;
        self
    }

    pub fn with_draft(mut self, draft: &'a str) -> Self {
        self.draft = Some(draft);
        self
    }

    pub fn with_rubric(mut self, rubric: &'a Rubric) -> Self {
        self.rubric = Some(rubric);
        self
    }

    pub fn with_oracle(mut self, oracle: &'a dyn IQualityOracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    pub fn with_cancel(mut self, cancel: &'a CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// The content-fidelity engine.
///
/// Holds a validated configuration; every operation is otherwise
/// stateless, so one engine can serve any number of concurrent reviews.
#[derive(Debug, Clone)]
pub struct FidelityEngine {
    config: FidelityConfig,
}

impl FidelityEngine {
    /// Validate `config` and build an engine around it.
    pub fn new(config: FidelityConfig) -> FidelityResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &FidelityConfig {
        &self.config
    }

    /// Word-preservation check of `transformed` against `source`.
    pub fn check_format(&self, source: &str, transformed: &str) -> FidelityResult<AlignmentReport> {
        SequenceAligner::new(self.config.alignment.clone()).check(source, transformed)
    }

    /// Ground every quote in `source`.
    pub fn check_quotes(&self, source: &str, quotes: &[Quote]) -> FidelityResult<QuoteReport> {
        if source.trim().is_empty() {
            return Err(InputError::empty("source").into());
        }
        Ok(QuoteMatcher::new(self.config.quotes.clone()).check(quotes, source))
    }

    /// Score (and, unless `single_pass`, revise) a draft.
    pub fn check_abstract(
        &self,
        draft: &str,
        rubric: &Rubric,
        oracle: &dyn IQualityOracle,
        single_pass: bool,
        cancel: Option<&CancellationToken>,
    ) -> FidelityResult<RefinementReport> {
        let mut config = self.config.refinement.clone();
        if single_pass {
            config.max_iterations = 1;
        }
        let session = QualityRefiner::new(config).refine(
            draft,
            rubric,
            oracle,
            cancel.map(|c| c as &dyn Cancellable),
        )?;
        Ok(build_report(session, oracle.name(), draft))
    }

    /// Run the checkers `ctx.mode` selects.
    pub fn review(&self, ctx: &ReviewContext<'_>) -> FidelityResult<FidelityReport> {
        let span = fidelity_core::review_span!(ctx.mode);
        let _guard = span.enter();

        let alignment = self.check_format(ctx.source, ctx.transformed)?;

        let mut quotes = None;
        let mut refinement = None;
        if ctx.mode.is_semantic() {
            if !ctx.quotes.is_empty() {
                quotes = Some(self.check_quotes(ctx.source, ctx.quotes)?);
            }
            if let Some(draft) = ctx.draft {
                let oracle = ctx.oracle.ok_or_else(|| OracleError::Unavailable {
                    reason: format!("mode {} scores the draft but no oracle was given", ctx.mode),
                })?;
                let default_rubric;
                let rubric = match ctx.rubric {
                    Some(rubric) => rubric,
                    None => {
                        default_rubric = self.default_rubric();
                        &default_rubric
                    }
                };
                refinement = Some(self.check_abstract(
                    draft,
                    rubric,
                    oracle,
                    ctx.mode == ReviewMode::SemanticSinglePass,
                    ctx.cancel,
                )?);
            }
        }

        let mut verdicts = vec![alignment.verdict];
        let mut passed = alignment.passed;
        if let Some(q) = &quotes {
            verdicts.push(q.verdict);
            passed &= q.passed;
        }
        if let Some(r) = &refinement {
            verdicts.push(r.verdict);
            passed &= r.passed;
        }
        let verdict = Verdict::worst(verdicts);
        passed &= !verdict.is_deny();

        let report = FidelityReport {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            mode: ctx.mode,
            source_digest: blake3::hash(ctx.source.as_bytes()).to_hex().to_string(),
            verdict,
            passed,
            alignment,
            quotes,
            refinement,
        };
        info!(run_id = %report.run_id, verdict = %report.verdict, passed, "review complete");
        Ok(report)
    }

    /// Review independent documents in parallel. Results keep input order;
    /// one failing review does not affect the others.
    pub fn review_batch(&self, contexts: &[ReviewContext<'_>]) -> Vec<FidelityResult<FidelityReport>> {
        contexts.par_iter().map(|ctx| self.review(ctx)).collect()
    }

    /// The summary rubric on the configured score scale.
    pub fn default_rubric(&self) -> Rubric {
        Rubric {
            scale: self.config.refinement.score_scale,
            ..Rubric::summary_default()
        }
    }
}
