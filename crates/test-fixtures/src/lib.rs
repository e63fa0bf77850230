//! Shared test fixtures: golden documents, sample projects, and a scripted
//! quality oracle.
//!
//! Fixture files live under this crate's `data/` directory and are located
//! at compile time, so any crate in the workspace can load them.

mod oracle;

pub use oracle::{scores_for, uniform_scores, ScriptedOracle};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::PathBuf;

/// Root directory of the fixture data.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/data"))
}

/// Absolute path to a fixture file or directory.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// Read a fixture as text.
///
/// # Panics
/// Panics if the file doesn't exist or isn't UTF-8.
pub fn load_text(relative_path: &str) -> String {
    let path = fixture_path(relative_path);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = load_text(relative_path);
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Directory of a sample review project (`data/projects/<name>`).
pub fn project_dir(name: &str) -> PathBuf {
    fixture_path(&format!("projects/{name}"))
}

/// Copy a sample project into `dest`, creating it if needed.
///
/// # Panics
/// Panics on any I/O failure.
pub fn copy_project(name: &str, dest: &std::path::Path) {
    let src = project_dir(name);
    std::fs::create_dir_all(dest)
        .unwrap_or_else(|e| panic!("Failed to create {}: {}", dest.display(), e));
    for entry in std::fs::read_dir(&src)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", src.display(), e))
    {
        let path = entry.expect("directory entry").path();
        if path.is_file() {
            let target = dest.join(path.file_name().expect("file name"));
            std::fs::copy(&path, &target)
                .unwrap_or_else(|e| panic!("Failed to copy {}: {}", path.display(), e));
        }
    }
}

/// One golden alignment case from `alignment_cases.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AlignmentCase {
    pub name: String,
    pub source: String,
    pub transformed: String,
    /// Tolerated categories by name; the configured defaults when absent.
    #[serde(default)]
    pub tolerated: Option<Vec<String>>,
    pub expect: AlignmentExpectation,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AlignmentExpectation {
    pub missing: usize,
    pub inserted: usize,
    pub passed: bool,
    /// "confirm", "unclear" or "deny".
    pub verdict: String,
}

/// All golden alignment cases.
pub fn alignment_cases() -> Vec<AlignmentCase> {
    load_fixture("alignment_cases.json")
}

/// One golden quote case from `quote_cases.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteCase {
    pub name: String,
    pub quote: String,
    /// "exact", "fuzzy_match" or "mismatch" at the default threshold.
    pub status: String,
    /// Expected matched source text, when the case pins it.
    #[serde(default)]
    pub span: Option<String>,
}

/// The source text the quote cases are matched against.
pub fn quote_source() -> String {
    load_text("quote_source.txt")
}

/// All golden quote cases.
pub fn quote_cases() -> Vec<QuoteCase> {
    load_fixture("quote_cases.json")
}
