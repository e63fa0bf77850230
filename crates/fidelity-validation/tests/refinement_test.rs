//! Refinement loop behavior against a scripted oracle.

use fidelity_core::config::{RefinementConfig, RetryConfig};
use fidelity_core::models::{DimensionScore, RefinementVerdict, Rubric};
use fidelity_core::{CancellationToken, FidelityError, OracleOutcome};
use fidelity_validation::refinement::build_report;
use fidelity_validation::{refine, QualityRefiner};
use test_fixtures::{scores_for, uniform_scores, ScriptedOracle};

const DRAFT: &str = "The summary draft.";

fn refiner(target: f64, max_iterations: u32) -> QualityRefiner {
    QualityRefiner::new(RefinementConfig {
        target_aggregate: target,
        max_iterations,
        retry: RetryConfig::immediate(3),
        ..RefinementConfig::default()
    })
}

#[test]
fn accepts_on_the_first_passing_iteration() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new()
        .then_uniform(&rubric, 3.0)
        .then_uniform(&rubric, 4.6)
        .then_uniform(&rubric, 5.0);
    let session = refiner(4.5, 5).refine(DRAFT, &rubric, &oracle, None).unwrap();

    assert_eq!(session.verdict(), &RefinementVerdict::Accepted { iteration: 2 });
    assert_eq!(session.assessments().len(), 2);
    assert_eq!(oracle.score_calls(), 2);
    assert_eq!(oracle.transform_calls(), 1);
    assert_eq!(session.final_draft(), oracle.scored_documents()[1]);
}

#[test]
fn exhausts_after_exactly_max_iterations() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new()
        .then_uniform(&rubric, 3.0)
        .then_uniform(&rubric, 3.5)
        .then_uniform(&rubric, 4.0)
        .then_uniform(&rubric, 5.0);
    let session = refiner(4.5, 3).refine(DRAFT, &rubric, &oracle, None).unwrap();

    assert_eq!(session.verdict(), &RefinementVerdict::Exhausted);
    assert_eq!(oracle.score_calls(), 3);
    assert_eq!(oracle.transform_calls(), 2);
    assert_eq!(session.assessments().len(), 3);
    assert_eq!(session.best_assessment().unwrap().iteration(), 3);
}

#[test]
fn never_scores_more_than_max_iterations() {
    let rubric = Rubric::summary_default();
    for max in 1..=4u32 {
        let mut oracle = ScriptedOracle::new();
        for _ in 0..10 {
            oracle = oracle.then_uniform(&rubric, 1.0);
        }
        let session = refiner(4.5, max).refine(DRAFT, &rubric, &oracle, None).unwrap();
        assert_eq!(oracle.score_calls(), max);
        assert!(session.assessments().len() as u32 <= max);
    }
}

#[test]
fn single_iteration_never_transforms() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new().then_uniform(&rubric, 2.0);
    let session = refiner(4.5, 1).refine(DRAFT, &rubric, &oracle, None).unwrap();
    assert_eq!(session.verdict(), &RefinementVerdict::Exhausted);
    assert_eq!(oracle.transform_calls(), 0);
    assert_eq!(session.final_draft(), DRAFT);
}

#[test]
fn transient_failures_do_not_consume_iterations() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new()
        .then_transient_scores(2, "HTTP 503")
        .then_uniform(&rubric, 3.0)
        .then_transient_scores(1, "timeout")
        .then_uniform(&rubric, 4.8);
    let session = refiner(4.5, 2).refine(DRAFT, &rubric, &oracle, None).unwrap();

    assert_eq!(session.verdict(), &RefinementVerdict::Accepted { iteration: 2 });
    let stats = session.stats();
    assert_eq!(stats.score_calls, 5);
    assert_eq!(stats.retries, 3);
    assert_eq!(stats.transform_calls, 1);
}

#[test]
fn retry_exhaustion_is_inconclusive_not_exhausted() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new()
        .then_uniform(&rubric, 3.0)
        .then_transient_scores(10, "HTTP 429");
    let session = refiner(4.5, 5).refine(DRAFT, &rubric, &oracle, None).unwrap();

    match session.verdict() {
        RefinementVerdict::Inconclusive {
            iteration,
            transient,
            reason,
        } => {
            assert_eq!(*iteration, 2);
            assert!(*transient);
            assert!(reason.contains("429"));
        }
        other => panic!("expected Inconclusive, got {other:?}"),
    }
    // 1 success + 1 attempt + 3 retries.
    assert_eq!(oracle.score_calls(), 5);
    assert_eq!(session.assessments().len(), 1);
}

#[test]
fn permanent_failure_is_inconclusive_immediately() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new()
        .then_score(OracleOutcome::PermanentFailure("HTTP 401".into()))
        .then_uniform(&rubric, 5.0);
    let session = refiner(4.5, 5).refine(DRAFT, &rubric, &oracle, None).unwrap();
    assert!(matches!(
        session.verdict(),
        RefinementVerdict::Inconclusive { iteration: 1, transient: false, .. }
    ));
    assert_eq!(oracle.score_calls(), 1);
}

#[test]
fn transform_failure_keeps_the_last_scored_draft() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new()
        .then_uniform(&rubric, 3.0)
        .then_transform(OracleOutcome::PermanentFailure("refused".into()));
    let session = refiner(4.5, 3).refine(DRAFT, &rubric, &oracle, None).unwrap();
    assert!(matches!(
        session.verdict(),
        RefinementVerdict::Inconclusive { iteration: 1, .. }
    ));
    assert_eq!(session.final_draft(), DRAFT);
}

#[test]
fn malformed_scores_are_inconclusive() {
    let rubric = Rubric::summary_default();
    let cases: Vec<Vec<DimensionScore>> = vec![
        vec![],
        vec![DimensionScore::new("faithfulness", 4.0, "")],
        uniform_scores(&rubric, 9.0),
        {
            let mut extra = uniform_scores(&rubric, 4.0);
            extra.push(DimensionScore::new("style", 4.0, ""));
            extra
        },
    ];
    for scores in cases {
        let oracle = ScriptedOracle::new().then_score(OracleOutcome::Success(scores));
        let session = refiner(4.5, 3).refine(DRAFT, &rubric, &oracle, None).unwrap();
        assert!(matches!(
            session.verdict(),
            RefinementVerdict::Inconclusive { transient: false, .. }
        ));
        assert!(session.assessments().is_empty());
    }
}

#[test]
fn cancellation_stops_between_iterations() {
    let rubric = Rubric::summary_default();
    let token = CancellationToken::new();
    let oracle = ScriptedOracle::new()
        .then_uniform(&rubric, 2.0)
        .then_uniform(&rubric, 3.0)
        .then_uniform(&rubric, 4.0)
        .cancel_after(2, token.clone());
    let session = refiner(4.5, 5)
        .refine(DRAFT, &rubric, &oracle, Some(&token))
        .unwrap();
    assert_eq!(
        session.verdict(),
        &RefinementVerdict::Cancelled {
            completed_iterations: 2
        }
    );
    assert_eq!(oracle.score_calls(), 2);
    assert_eq!(session.assessments().len(), 2);
}

#[test]
fn feedback_names_the_weakest_dimensions() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new()
        .then_score(OracleOutcome::Success(scores_for(&rubric, &[4.0, 2.0, 5.0, 3.0])))
        .then_uniform(&rubric, 5.0);
    refiner(4.5, 2).refine(DRAFT, &rubric, &oracle, None).unwrap();

    let instructions = oracle.instructions();
    assert_eq!(instructions.len(), 1);
    let text = &instructions[0];
    let coverage = text.find("coverage").unwrap();
    let concision = text.find("concision").unwrap();
    assert!(coverage < concision);
    assert!(!text.contains("coherence"));
    assert!(!text.contains("faithfulness ("));
}

#[test]
fn revised_draft_is_what_gets_scored_next() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new()
        .then_uniform(&rubric, 2.0)
        .then_uniform(&rubric, 5.0)
        .then_transform(OracleOutcome::Success("A much better summary.".into()));
    let session = refiner(4.5, 3).refine(DRAFT, &rubric, &oracle, None).unwrap();
    assert_eq!(
        oracle.scored_documents(),
        vec![DRAFT.to_string(), "A much better summary.".to_string()]
    );
    assert_eq!(session.final_draft(), "A much better summary.");

    let report = build_report(session, "scripted", DRAFT);
    assert!(report.passed);
    assert!(report.revised);
    assert!(report.findings.is_empty());
}

#[test]
fn exhausted_report_lists_dimensions_below_target() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new()
        .then_score(OracleOutcome::Success(scores_for(&rubric, &[5.0, 2.0, 4.0, 5.0])));
    let session = refiner(4.5, 1).refine(DRAFT, &rubric, &oracle, None).unwrap();
    let report = build_report(session, "scripted", DRAFT);
    assert!(!report.passed);
    let subjects: Vec<&str> = report.findings.iter().map(|f| f.subject.as_str()).collect();
    assert_eq!(subjects, vec!["coverage", "coherence"]);
    assert!(!report.revised);
}

#[test]
fn invalid_inputs_fail_fast() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new();
    assert!(matches!(
        refiner(4.5, 3).refine("   ", &rubric, &oracle, None),
        Err(FidelityError::Input(_))
    ));
    let empty = Rubric {
        dimensions: vec![],
        ..Rubric::summary_default()
    };
    assert!(refiner(4.5, 3).refine(DRAFT, &empty, &oracle, None).is_err());
    assert!(refiner(9.0, 3).refine(DRAFT, &rubric, &oracle, None).is_err());
    assert_eq!(oracle.score_calls(), 0);
}

#[test]
fn free_function_uses_defaults() {
    let rubric = Rubric::summary_default();
    let oracle = ScriptedOracle::new().then_uniform(&rubric, 4.5);
    let session = refine(DRAFT, &rubric, 4.5, 5, &oracle).unwrap();
    assert_eq!(session.verdict(), &RefinementVerdict::Accepted { iteration: 1 });
    assert_eq!(session.max_iterations(), 5);
}
