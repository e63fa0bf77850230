//! Fuzzy quote grounding.

mod matcher;
mod similarity;

pub use matcher::{classify, match_in_index, match_quote, SourceIndex};
pub use similarity::similarity_ratio;

use fidelity_core::config::QuoteConfig;
use fidelity_core::models::{MatchResult, MatchStatus, Quote, Verdict};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::evidence::excerpt;
use crate::report::{QuoteFinding, QuoteReport};

/// Share of grounded (Exact or FuzzyMatch) results; 1.0 for none.
pub fn grounded_ratio(results: &[MatchResult]) -> f64 {
    if results.is_empty() {
        return 1.0;
    }
    let grounded = results.iter().filter(|r| r.status.is_grounded()).count();
    grounded as f64 / results.len() as f64
}

/// Verdict for one match: grounded quotes confirm, mismatches deny.
pub fn quote_verdict(status: MatchStatus) -> Verdict {
    match status {
        MatchStatus::Exact | MatchStatus::FuzzyMatch => Verdict::Confirm,
        MatchStatus::Mismatch => Verdict::Deny,
    }
}

/// Matches quotes against one source under a [`QuoteConfig`].
#[derive(Debug, Clone)]
pub struct QuoteMatcher {
    config: QuoteConfig,
}

impl QuoteMatcher {
    pub fn new(config: QuoteConfig) -> Self {
        Self { config }
    }

    /// Match every quote, in parallel, preserving input order.
    pub fn match_all(&self, quotes: &[Quote], source: &str) -> Vec<MatchResult> {
        let index = SourceIndex::new(source);
        let threshold = self.config.fuzzy_threshold;
        quotes
            .par_iter()
            .map(|quote| match_in_index(quote, &index, threshold))
            .collect()
    }

    pub fn check(&self, quotes: &[Quote], source: &str) -> QuoteReport {
        let span = fidelity_core::quote_span!(quotes.len(), self.config.fuzzy_threshold);
        let _guard = span.enter();

        let results = self.match_all(quotes, source);
        let grounded = grounded_ratio(&results);

        let findings: Vec<QuoteFinding> = results
            .into_iter()
            .map(|result| {
                let evidence = result
                    .span
                    .as_ref()
                    .map(|s| {
                        excerpt(
                            source,
                            s.start_offset,
                            s.end_offset,
                            self.config.evidence_context_chars,
                        )
                    })
                    .unwrap_or_default();
                debug!(
                    quote = %result.quote.text,
                    ratio = result.ratio,
                    status = ?result.status,
                    "quote matched"
                );
                QuoteFinding {
                    verdict: quote_verdict(result.status),
                    result,
                    evidence,
                }
            })
            .collect();

        let verdict = Verdict::worst(findings.iter().map(|f| f.verdict));
        let passed = !verdict.is_deny() && grounded >= self.config.grounded_claim_pass_ratio;
        info!(quotes = findings.len(), grounded, passed, "quote check complete");

        QuoteReport {
            verdict,
            passed,
            grounded_ratio: grounded,
            threshold: self.config.fuzzy_threshold,
            quotes: findings,
        }
    }
}
