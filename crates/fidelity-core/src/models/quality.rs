//! Quality scoring records for the refinement loop.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::errors::InputError;

/// Closed numeric range every dimension score must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreScale {
    pub min: f64,
    pub max: f64,
}

impl ScoreScale {
    pub fn contains(&self, score: f64) -> bool {
        score.is_finite() && score >= self.min && score <= self.max
    }
}

impl Default for ScoreScale {
    fn default() -> Self {
        Self { min: 1.0, max: 5.0 }
    }
}

/// One axis the oracle is asked to score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricDimension {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl RubricDimension {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Ordered scoring rubric handed to the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub dimensions: Vec<RubricDimension>,
    #[serde(default)]
    pub scale: ScoreScale,
}

impl Rubric {
    /// Build a rubric, rejecting an empty or duplicated dimension list.
    pub fn new(dimensions: Vec<RubricDimension>, scale: ScoreScale) -> Result<Self, InputError> {
        let rubric = Self { dimensions, scale };
        rubric.validate()?;
        Ok(rubric)
    }

    /// The default rubric for abstractive summaries.
    pub fn summary_default() -> Self {
        Self {
            dimensions: vec![
                RubricDimension::new(
                    "faithfulness",
                    "Every statement is supported by the source; nothing is invented.",
                ),
                RubricDimension::new("coverage", "The main points of the source are present."),
                RubricDimension::new("coherence", "The summary reads as one connected argument."),
                RubricDimension::new("concision", "No padding, repetition or digression."),
            ],
            scale: ScoreScale::default(),
        }
    }

    pub fn validate(&self) -> Result<(), InputError> {
        if self.dimensions.is_empty() {
            return Err(InputError::empty("rubric.dimensions"));
        }
        if !(self.scale.min.is_finite() && self.scale.max.is_finite())
            || self.scale.min >= self.scale.max
        {
            return Err(InputError::malformed(
                "rubric.scale",
                format!("invalid range {}..={}", self.scale.min, self.scale.max),
            ));
        }
        let mut seen = HashSet::new();
        for dim in &self.dimensions {
            if dim.name.trim().is_empty() {
                return Err(InputError::empty("rubric.dimensions[].name"));
            }
            if !seen.insert(dim.name.as_str()) {
                return Err(InputError::malformed(
                    "rubric.dimensions",
                    format!("duplicate dimension '{}'", dim.name),
                ));
            }
        }
        Ok(())
    }

    pub fn has_dimension(&self, name: &str) -> bool {
        self.dimensions.iter().any(|d| d.name == name)
    }
}

/// Raw per-dimension score as returned by an oracle, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub dimension_name: String,
    pub score: f64,
    #[serde(default)]
    pub rationale: String,
}

impl DimensionScore {
    pub fn new(dimension_name: impl Into<String>, score: f64, rationale: impl Into<String>) -> Self {
        Self {
            dimension_name: dimension_name.into(),
            score,
            rationale: rationale.into(),
        }
    }
}

/// A validated dimension score. Deserializing re-runs the scale check
/// against the recorded scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQualityDimension")]
pub struct QualityDimension {
    name: String,
    score: f64,
    rationale: String,
    scale: ScoreScale,
}

#[derive(Deserialize)]
struct RawQualityDimension {
    name: String,
    score: f64,
    #[serde(default)]
    rationale: String,
    #[serde(default)]
    scale: ScoreScale,
}

impl TryFrom<RawQualityDimension> for QualityDimension {
    type Error = InputError;

    fn try_from(raw: RawQualityDimension) -> Result<Self, Self::Error> {
        Self::new(raw.name, raw.score, raw.rationale, raw.scale)
    }
}

impl QualityDimension {
    pub fn new(
        name: impl Into<String>,
        score: f64,
        rationale: impl Into<String>,
        scale: ScoreScale,
    ) -> Result<Self, InputError> {
        let name = name.into();
        if !scale.contains(score) {
            return Err(InputError::ScoreOutOfScale {
                dimension: name,
                score,
                min: scale.min,
                max: scale.max,
            });
        }
        Ok(Self {
            name,
            score,
            rationale: rationale.into(),
            scale,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    pub fn scale(&self) -> ScoreScale {
        self.scale
    }
}

/// All dimension scores for one iteration. Deserializing re-runs the
/// iteration check and rejects an aggregate that is not the mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQualityAssessment")]
pub struct QualityAssessment {
    iteration: u32,
    dimensions: Vec<QualityDimension>,
    aggregate: f64,
}

#[derive(Deserialize)]
struct RawQualityAssessment {
    iteration: u32,
    dimensions: Vec<QualityDimension>,
    aggregate: Option<f64>,
}

impl TryFrom<RawQualityAssessment> for QualityAssessment {
    type Error = InputError;

    fn try_from(raw: RawQualityAssessment) -> Result<Self, Self::Error> {
        let assessment = Self::new(raw.iteration, raw.dimensions)?;
        match raw.aggregate {
            Some(recorded) if (recorded - assessment.aggregate).abs() > 1e-9 => {
                Err(InputError::malformed(
                    "assessment.aggregate",
                    format!("recorded {recorded}, dimensions average {}", assessment.aggregate),
                ))
            }
            _ => Ok(assessment),
        }
    }
}

impl QualityAssessment {
    /// `iteration` is 1-based. The aggregate is the arithmetic mean.
    pub fn new(iteration: u32, dimensions: Vec<QualityDimension>) -> Result<Self, InputError> {
        if iteration == 0 {
            return Err(InputError::malformed("iteration", "iterations are 1-based"));
        }
        if dimensions.is_empty() {
            return Err(InputError::empty("assessment.dimensions"));
        }
        let aggregate = dimensions.iter().map(|d| d.score).sum::<f64>() / dimensions.len() as f64;
        Ok(Self {
            iteration,
            dimensions,
            aggregate,
        })
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn dimensions(&self) -> &[QualityDimension] {
        &self.dimensions
    }

    pub fn aggregate(&self) -> f64 {
        self.aggregate
    }

    /// Up to `n` dimensions, lowest score first. Ties keep rubric order.
    pub fn lowest(&self, n: usize) -> Vec<&QualityDimension> {
        let mut dims: Vec<&QualityDimension> = self.dimensions.iter().collect();
        dims.sort_by(|a, b| a.score.total_cmp(&b.score));
        dims.truncate(n);
        dims
    }
}

/// Terminal state of a refinement session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RefinementVerdict {
    /// The aggregate reached the target at this iteration.
    Accepted { iteration: u32 },
    /// Every iteration was scored and none reached the target.
    Exhausted,
    /// An oracle call failed for good; quality is unknown.
    Inconclusive {
        iteration: u32,
        reason: String,
        transient: bool,
    },
    /// The caller cancelled between iterations.
    Cancelled { completed_iterations: u32 },
}

impl RefinementVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Oracle traffic of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleCallStats {
    pub score_calls: u32,
    pub transform_calls: u32,
    /// Extra attempts after transient failures.
    pub retries: u32,
}

/// The full record of one refinement loop. Owned by the caller once the
/// refiner returns it; nothing else holds a reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementSession {
    assessments: Vec<QualityAssessment>,
    target_aggregate: f64,
    max_iterations: u32,
    verdict: RefinementVerdict,
    final_draft: String,
    stats: OracleCallStats,
}

impl RefinementSession {
    pub fn new(
        assessments: Vec<QualityAssessment>,
        target_aggregate: f64,
        max_iterations: u32,
        verdict: RefinementVerdict,
        final_draft: String,
        stats: OracleCallStats,
    ) -> Self {
        Self {
            assessments,
            target_aggregate,
            max_iterations,
            verdict,
            final_draft,
            stats,
        }
    }

    pub fn assessments(&self) -> &[QualityAssessment] {
        &self.assessments
    }

    pub fn target_aggregate(&self) -> f64 {
        self.target_aggregate
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn verdict(&self) -> &RefinementVerdict {
        &self.verdict
    }

    /// The draft that was scored last.
    pub fn final_draft(&self) -> &str {
        &self.final_draft
    }

    pub fn stats(&self) -> OracleCallStats {
        self.stats
    }

    pub fn last_assessment(&self) -> Option<&QualityAssessment> {
        self.assessments.last()
    }

    /// Highest-aggregate assessment; the earliest wins a tie.
    pub fn best_assessment(&self) -> Option<&QualityAssessment> {
        self.assessments
            .iter()
            .reduce(|best, a| if a.aggregate > best.aggregate { a } else { best })
    }
}
