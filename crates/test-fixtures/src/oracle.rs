//! A deterministic, scripted [`IQualityOracle`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use fidelity_core::models::{DimensionScore, Rubric};
use fidelity_core::traits::Cancellable;
use fidelity_core::{CancellationToken, IQualityOracle, OracleOutcome};

/// Oracle that replays queued outcomes and records every call.
///
/// When the score queue runs dry, `score` fails permanently. When the
/// transform queue runs dry, `transform` succeeds with a marked revision
/// of its input.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    name: String,
    scores: Mutex<VecDeque<OracleOutcome<Vec<DimensionScore>>>>,
    transforms: Mutex<VecDeque<OracleOutcome<String>>>,
    score_calls: AtomicU32,
    transform_calls: AtomicU32,
    scored_documents: Mutex<Vec<String>>,
    instructions: Mutex<Vec<String>>,
    cancel_after: Option<(u32, CancellationToken)>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self {
            name: "scripted".to_string(),
            ..Self::default()
        }
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Queue the next score outcome.
    pub fn then_score(self, outcome: OracleOutcome<Vec<DimensionScore>>) -> Self {
        self.scores.lock().unwrap().push_back(outcome);
        self
    }

    /// Queue a successful score of `score` on every rubric dimension.
    pub fn then_uniform(self, rubric: &Rubric, score: f64) -> Self {
        self.then_score(OracleOutcome::Success(uniform_scores(rubric, score)))
    }

    /// Queue `n` transient score failures.
    pub fn then_transient_scores(mut self, n: usize, reason: &str) -> Self {
        for _ in 0..n {
            self = self.then_score(OracleOutcome::TransientFailure(reason.to_string()));
        }
        self
    }

    /// Queue the next transform outcome.
    pub fn then_transform(self, outcome: OracleOutcome<String>) -> Self {
        self.transforms.lock().unwrap().push_back(outcome);
        self
    }

    /// Cancel `token` once `calls` score calls have been answered.
    pub fn cancel_after(mut self, calls: u32, token: CancellationToken) -> Self {
        self.cancel_after = Some((calls, token));
        self
    }

    pub fn score_calls(&self) -> u32 {
        self.score_calls.load(Ordering::SeqCst)
    }

    pub fn transform_calls(&self) -> u32 {
        self.transform_calls.load(Ordering::SeqCst)
    }

    /// Every document passed to `score`, in call order.
    pub fn scored_documents(&self) -> Vec<String> {
        self.scored_documents.lock().unwrap().clone()
    }

    /// Every instruction passed to `transform`, in call order.
    pub fn instructions(&self) -> Vec<String> {
        self.instructions.lock().unwrap().clone()
    }
}

impl IQualityOracle for ScriptedOracle {
    fn score(&self, document: &str, _rubric: &Rubric) -> OracleOutcome<Vec<DimensionScore>> {
        let n = self.score_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.scored_documents
            .lock()
            .unwrap()
            .push(document.to_string());
        let outcome = self
            .scores
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| OracleOutcome::PermanentFailure("score script exhausted".into()));
        if let Some((after, token)) = &self.cancel_after {
            if n >= *after {
                token.cancel();
            }
        }
        outcome
    }

    fn transform(&self, document: &str, instruction: &str) -> OracleOutcome<String> {
        let n = self.transform_calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.instructions
            .lock()
            .unwrap()
            .push(instruction.to_string());
        self.transforms
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| OracleOutcome::Success(format!("{document}\n(revision {n})")))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// `score` on every dimension of `rubric`.
pub fn uniform_scores(rubric: &Rubric, score: f64) -> Vec<DimensionScore> {
    rubric
        .dimensions
        .iter()
        .map(|d| DimensionScore::new(d.name.clone(), score, format!("{} scored {score}", d.name)))
        .collect()
}

/// One score per rubric dimension, in rubric order.
///
/// # Panics
/// Panics if `scores` and the rubric differ in length.
pub fn scores_for(rubric: &Rubric, scores: &[f64]) -> Vec<DimensionScore> {
    assert_eq!(rubric.dimensions.len(), scores.len(), "one score per dimension");
    rubric
        .dimensions
        .iter()
        .zip(scores)
        .map(|(d, s)| DimensionScore::new(d.name.clone(), *s, format!("{} needs work", d.name)))
        .collect()
}
