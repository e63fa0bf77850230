mod common;

use common::{fidelity, serve_once, TestProject};
use predicates::prelude::*;
use serde_json::Value;

#[test]
fn format_only_pass_exits_zero_and_writes_report() {
    let project = TestProject::copy("interview");
    project
        .review("format-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("(pass)"));

    let report = project.report();
    assert_eq!(report["mode"], "format-only");
    assert_eq!(report["passed"], true);
    assert_eq!(report["alignment"]["missing"], 0);
    assert!(report["quotes"].is_null());
    assert_eq!(report["source_digest"].as_str().map(str::len), Some(64));
}

#[test]
fn deleted_source_content_exits_one() {
    let project = TestProject::copy("lecture");
    project.review("format-only").assert().code(1);

    let report = project.report();
    assert_eq!(report["verdict"], "deny");
    assert_eq!(report["passed"], false);
    assert!(report["alignment"]["missing"].as_u64().unwrap() > 0);
}

#[test]
fn missing_project_is_an_operational_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    fidelity()
        .arg("review")
        .arg("--project")
        .arg(tmp.path().join("nope"))
        .arg("--out")
        .arg(tmp.path().join("report.json"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
    assert!(!tmp.path().join("report.json").exists());
}

#[test]
fn semantic_mode_checks_quotes_without_an_oracle_when_there_is_no_draft() {
    let project = TestProject::copy("lecture");
    let output = project
        .review("semantic-single-pass")
        .arg("--json")
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();

    let printed: Value = serde_json::from_slice(&output).expect("json on stdout");
    let quotes = printed["quotes"]["quotes"].as_array().expect("quote findings");
    assert_eq!(quotes.len(), 2);
    assert!(quotes.iter().any(|q| q["status"] == "mismatch" && q["verdict"] == "deny"));
    assert!(printed["refinement"].is_null());
}

#[test]
fn draft_without_oracle_is_an_operational_error() {
    let project = TestProject::copy("interview");
    project
        .review("semantic-single-pass")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no oracle"));
}

#[test]
fn single_pass_scores_the_draft_through_the_http_oracle() {
    let project = TestProject::copy("interview");
    let (url, server) = serve_once(
        r#"{"dimensions":[
            {"dimension_name":"faithfulness","score":5.0,"rationale":"supported"},
            {"dimension_name":"coverage","score":4.5,"rationale":"main points present"}
        ]}"#,
    );

    project
        .review("semantic-single-pass")
        .arg("--oracle-url")
        .arg(&url)
        .assert()
        .success();
    assert!(server.join().unwrap().starts_with("POST /score"));

    let report = project.report();
    assert_eq!(report["refinement"]["outcome"]["status"], "accepted");
    assert_eq!(report["refinement"]["iterations"], 1);
    assert_eq!(report["quotes"]["passed"], true);
    assert_eq!(report["passed"], true);
}

#[test]
fn show_config_prints_resolved_toml() {
    let project = TestProject::copy("interview");
    fidelity()
        .arg("show-config")
        .arg("--project")
        .arg(&project.dir)
        .arg("--lookahead")
        .arg("12")
        .assert()
        .success()
        .stdout(predicate::str::contains("[alignment]"))
        .stdout(predicate::str::contains("lookahead_window = 12"))
        .stdout(predicate::str::contains("max_iterations = 3"));
}

#[test]
fn invalid_override_is_rejected() {
    fidelity()
        .arg("show-config")
        .arg("--fuzzy-threshold")
        .arg("1.5")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("fuzzy_threshold"))
        .stderr(predicate::str::contains("error [CONFIG_ERROR]"));
}

#[test]
fn invalid_environment_override_carries_its_code() {
    let project = TestProject::copy("interview");
    fidelity()
        .env("FIDELITY_MAX_ITERATIONS", "many")
        .arg("show-config")
        .arg("--project")
        .arg(&project.dir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error [CONFIG_ERROR]"))
        .stderr(predicate::str::contains("FIDELITY_MAX_ITERATIONS"));
}

#[test]
fn log_directives_come_from_the_environment() {
    let project = TestProject::copy("lecture");
    project
        .review("format-only")
        .env("FIDELITY_LOG", "fidelity_validation=debug")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("alignment finding"));

    project
        .review("format-only")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("alignment finding").not());
}
