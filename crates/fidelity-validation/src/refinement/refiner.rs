//! The bounded score-and-revise loop.

use fidelity_core::config::RefinementConfig;
use fidelity_core::errors::InputError;
use fidelity_core::models::{
    DimensionScore, OracleCallStats, QualityAssessment, QualityDimension, RefinementSession,
    RefinementVerdict, Rubric,
};
use fidelity_core::traits::Cancellable;
use fidelity_core::{FidelityResult, IQualityOracle};
use tracing::{info, warn};

use super::feedback::revision_instruction;
use super::retry::{call_with_retry, Attempts};

/// Drives a draft toward a target aggregate score through an oracle.
///
/// Each iteration scores the current draft once. The loop stops at the
/// first draft whose aggregate reaches the target, after `max_iterations`
/// scoring passes, on a failed oracle call, or on cancellation. Retries
/// of transient failures never consume an iteration.
#[derive(Debug, Clone)]
pub struct QualityRefiner {
    config: RefinementConfig,
}

impl QualityRefiner {
    pub fn new(config: RefinementConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RefinementConfig {
        &self.config
    }

    /// Run the loop. Input problems are errors; oracle problems end the
    /// session with an [`RefinementVerdict::Inconclusive`] verdict.
    pub fn refine(
        &self,
        initial_draft: &str,
        rubric: &Rubric,
        oracle: &dyn IQualityOracle,
        cancel: Option<&dyn Cancellable>,
    ) -> FidelityResult<RefinementSession> {
        self.check_inputs(initial_draft, rubric)?;

        let target = self.config.target_aggregate;
        let max = self.config.max_iterations;
        let span = fidelity_core::refinement_span!(oracle.name(), max);
        let _guard = span.enter();

        let mut stats = OracleCallStats::default();
        let mut assessments: Vec<QualityAssessment> = Vec::new();
        let mut draft = initial_draft.to_string();
        let mut scored_draft = draft.clone();
        let mut iteration = 0u32;

        let verdict = loop {
            if cancel.is_some_and(|c| c.is_cancelled()) {
                info!(completed = iteration, "refinement cancelled");
                break RefinementVerdict::Cancelled {
                    completed_iterations: iteration,
                };
            }
            iteration += 1;

            let mut attempts = Attempts::default();
            let scored = call_with_retry(&self.config.retry, "score", &mut attempts, || {
                oracle.score(&draft, rubric)
            });
            stats.score_calls += attempts.calls;
            stats.retries += attempts.retries;
            let scores = match scored {
                Ok(scores) => scores,
                Err(failure) => {
                    break RefinementVerdict::Inconclusive {
                        iteration,
                        reason: failure.reason().to_string(),
                        transient: failure.is_transient(),
                    };
                }
            };

            let assessment = match assess(iteration, scores, rubric) {
                Ok(assessment) => assessment,
                Err(e) => {
                    warn!(iteration, error = %e, "oracle returned a malformed assessment");
                    break RefinementVerdict::Inconclusive {
                        iteration,
                        reason: e.to_string(),
                        transient: false,
                    };
                }
            };
            let aggregate = assessment.aggregate();
            info!(iteration, aggregate, target, "draft scored");
            scored_draft.clone_from(&draft);

            if aggregate >= target {
                assessments.push(assessment);
                break RefinementVerdict::Accepted { iteration };
            }
            if iteration >= max {
                assessments.push(assessment);
                break RefinementVerdict::Exhausted;
            }

            let instruction =
                revision_instruction(&assessment, target, self.config.feedback_dimensions);
            assessments.push(assessment);

            let mut attempts = Attempts::default();
            let revised = call_with_retry(&self.config.retry, "transform", &mut attempts, || {
                oracle.transform(&draft, &instruction)
            });
            stats.transform_calls += attempts.calls;
            stats.retries += attempts.retries;
            match revised {
                Ok(text) if text.trim().is_empty() => {
                    warn!(iteration, "oracle returned an empty revision");
                    break RefinementVerdict::Inconclusive {
                        iteration,
                        reason: "oracle returned an empty revision".to_string(),
                        transient: false,
                    };
                }
                Ok(text) => draft = text,
                Err(failure) => {
                    break RefinementVerdict::Inconclusive {
                        iteration,
                        reason: failure.reason().to_string(),
                        transient: failure.is_transient(),
                    };
                }
            }
        };

        info!(
            verdict = ?verdict,
            scored = assessments.len(),
            score_calls = stats.score_calls,
            transform_calls = stats.transform_calls,
            retries = stats.retries,
            "refinement finished"
        );

        Ok(RefinementSession::new(
            assessments,
            target,
            max,
            verdict,
            scored_draft,
            stats,
        ))
    }

    fn check_inputs(&self, draft: &str, rubric: &Rubric) -> Result<(), InputError> {
        if draft.trim().is_empty() {
            return Err(InputError::empty("draft"));
        }
        rubric.validate()?;
        if self.config.max_iterations == 0 {
            return Err(InputError::malformed("max_iterations", "must be at least 1"));
        }
        let target = self.config.target_aggregate;
        if !rubric.scale.contains(target) {
            return Err(InputError::malformed(
                "target_aggregate",
                format!(
                    "{target} outside rubric scale {}..={}",
                    rubric.scale.min, rubric.scale.max
                ),
            ));
        }
        Ok(())
    }
}

/// Validate raw oracle scores against the rubric: exactly one in-scale
/// score per rubric dimension and nothing else. Dimensions come back in
/// rubric order.
pub(crate) fn assess(
    iteration: u32,
    scores: Vec<DimensionScore>,
    rubric: &Rubric,
) -> Result<QualityAssessment, InputError> {
    if scores.is_empty() {
        return Err(InputError::empty("oracle scores"));
    }
    if let Some(unknown) = scores.iter().find(|s| !rubric.has_dimension(&s.dimension_name)) {
        return Err(InputError::malformed(
            "oracle scores",
            format!("unknown dimension '{}'", unknown.dimension_name),
        ));
    }

    let mut dimensions = Vec::with_capacity(rubric.dimensions.len());
    for dim in &rubric.dimensions {
        let mut matching = scores.iter().filter(|s| s.dimension_name == dim.name);
        let Some(score) = matching.next() else {
            return Err(InputError::malformed(
                "oracle scores",
                format!("missing dimension '{}'", dim.name),
            ));
        };
        if matching.next().is_some() {
            return Err(InputError::malformed(
                "oracle scores",
                format!("dimension '{}' scored twice", dim.name),
            ));
        }
        dimensions.push(QualityDimension::new(
            dim.name.as_str(),
            score.score,
            score.rationale.as_str(),
            rubric.scale,
        )?);
    }
    QualityAssessment::new(iteration, dimensions)
}

/// Run a refinement session with the default retry policy and feedback
/// width.
pub fn refine(
    initial_draft: &str,
    rubric: &Rubric,
    target_aggregate: f64,
    max_iterations: u32,
    oracle: &dyn IQualityOracle,
) -> FidelityResult<RefinementSession> {
    let config = RefinementConfig {
        target_aggregate,
        max_iterations,
        score_scale: rubric.scale,
        ..RefinementConfig::default()
    };
    QualityRefiner::new(config).refine(initial_draft, rubric, oracle, None)
}
