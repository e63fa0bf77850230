//! Top-level fidelity configuration with layered resolution.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::constants::PROJECT_CONFIG_FILE;
use crate::errors::ConfigError;
use crate::models::{InsertionCategory, ScoreScale};

/// Sequence aligner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignmentConfig {
    /// Insertion categories allowed to have no source counterpart.
    pub tolerated_categories: BTreeSet<InsertionCategory>,
    /// How many transformed tokens to scan ahead before declaring a loss.
    pub lookahead_window: usize,
    /// Preservation ratio a check may fall to and still pass when it has
    /// Missing tokens. 1.0 means no Missing token is tolerated.
    pub min_preservation_ratio: f64,
    /// Surface tokens shown on either side of a finding.
    pub evidence_context_tokens: usize,
}

impl AlignmentConfig {
    pub fn tolerates(&self, category: InsertionCategory) -> bool {
        self.tolerated_categories.contains(&category)
    }

    pub fn default_tolerated_categories() -> BTreeSet<InsertionCategory> {
        [
            InsertionCategory::Heading,
            InsertionCategory::SpeakerLabel,
            InsertionCategory::StructuralMarker,
            InsertionCategory::Timestamp,
            InsertionCategory::Realignment,
        ]
        .into_iter()
        .collect()
    }
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            tolerated_categories: Self::default_tolerated_categories(),
            lookahead_window: defaults::DEFAULT_LOOKAHEAD_WINDOW,
            min_preservation_ratio: defaults::DEFAULT_MIN_PRESERVATION_RATIO,
            evidence_context_tokens: defaults::DEFAULT_EVIDENCE_CONTEXT_TOKENS,
        }
    }
}

/// Fuzzy quote matcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteConfig {
    /// Minimum similarity for a FuzzyMatch; below is a Mismatch.
    pub fuzzy_threshold: f64,
    /// Bytes of source context shown around a match.
    pub evidence_context_chars: usize,
    /// Share of quotes that must be grounded for a review to pass.
    pub grounded_claim_pass_ratio: f64,
}

impl Default for QuoteConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: defaults::DEFAULT_FUZZY_THRESHOLD,
            evidence_context_chars: defaults::DEFAULT_EVIDENCE_CONTEXT_CHARS,
            grounded_claim_pass_ratio: defaults::DEFAULT_GROUNDED_CLAIM_PASS_RATIO,
        }
    }
}

/// Transient-failure retry policy for oracle calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Extra attempts after the first transient failure.
    pub max_retries: u32,
    /// Initial backoff (doubles each retry).
    pub initial_backoff_ms: u64,
    /// Backoff ceiling.
    pub max_backoff_ms: u64,
}

impl RetryConfig {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }

    /// No waiting between attempts. Intended for tests.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_backoff_ms: 0,
            max_backoff_ms: 0,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            initial_backoff_ms: defaults::DEFAULT_INITIAL_BACKOFF_MS,
            max_backoff_ms: defaults::DEFAULT_MAX_BACKOFF_MS,
        }
    }
}

/// Iterative quality refiner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinementConfig {
    /// Aggregate score at which a draft is accepted.
    pub target_aggregate: f64,
    /// Hard bound on scoring calls per session.
    pub max_iterations: u32,
    /// Lowest-scoring dimensions quoted back in revision feedback.
    pub feedback_dimensions: usize,
    pub score_scale: ScoreScale,
    pub retry: RetryConfig,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            target_aggregate: defaults::DEFAULT_TARGET_AGGREGATE,
            max_iterations: defaults::DEFAULT_MAX_ITERATIONS,
            feedback_dimensions: defaults::DEFAULT_FEEDBACK_DIMENSIONS,
            score_scale: ScoreScale {
                min: defaults::DEFAULT_SCORE_MIN,
                max: defaults::DEFAULT_SCORE_MAX,
            },
            retry: RetryConfig::default(),
        }
    }
}

/// Oracle endpoint settings, consumed by concrete oracle adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    /// Base URL of an HTTP oracle. Required to score a draft.
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: defaults::DEFAULT_ORACLE_TIMEOUT_SECS,
        }
    }
}

/// File names inside a review project directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub source_file: String,
    pub transformed_file: String,
    pub quotes_file: String,
    pub draft_file: String,
    pub rubric_file: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            source_file: defaults::DEFAULT_SOURCE_FILE.to_string(),
            transformed_file: defaults::DEFAULT_TRANSFORMED_FILE.to_string(),
            quotes_file: defaults::DEFAULT_QUOTES_FILE.to_string(),
            draft_file: defaults::DEFAULT_DRAFT_FILE.to_string(),
            rubric_file: defaults::DEFAULT_RUBRIC_FILE.to_string(),
        }
    }
}

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`FIDELITY_*`)
/// 3. Project config (`fidelity.toml` in the project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FidelityConfig {
    pub alignment: AlignmentConfig,
    pub quotes: QuoteConfig,
    pub refinement: RefinementConfig,
    pub oracle: OracleConfig,
    pub project: ProjectConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub fuzzy_threshold: Option<f64>,
    pub target_aggregate: Option<f64>,
    pub max_iterations: Option<u32>,
    pub lookahead_window: Option<usize>,
    pub tolerated_categories: Option<Vec<InsertionCategory>>,
    pub oracle_endpoint: Option<String>,
}

impl FidelityConfig {
    /// Load configuration with layered resolution, then validate.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        let mut config = if project_config_path.exists() {
            Self::load_file(&project_config_path)?
        } else {
            Self::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;

        if let Some(cli) = cli_overrides {
            config.apply_cli_overrides(cli);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a single TOML file over the compiled defaults. Not validated.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from a TOML string and validate it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("quotes.fuzzy_threshold", self.quotes.fuzzy_threshold)?;
        unit_interval(
            "quotes.grounded_claim_pass_ratio",
            self.quotes.grounded_claim_pass_ratio,
        )?;
        unit_interval(
            "alignment.min_preservation_ratio",
            self.alignment.min_preservation_ratio,
        )?;

        if self.alignment.lookahead_window > defaults::MAX_LOOKAHEAD_WINDOW {
            return Err(failed(
                "alignment.lookahead_window",
                format!("must be at most {}", defaults::MAX_LOOKAHEAD_WINDOW),
            ));
        }
        if self.quotes.evidence_context_chars == 0 {
            return Err(failed("quotes.evidence_context_chars", "must be greater than 0"));
        }

        let r = &self.refinement;
        if r.max_iterations == 0 {
            return Err(failed("refinement.max_iterations", "must be greater than 0"));
        }
        if r.feedback_dimensions == 0 {
            return Err(failed("refinement.feedback_dimensions", "must be greater than 0"));
        }
        let scale = r.score_scale;
        if !(scale.min.is_finite() && scale.max.is_finite()) || scale.min >= scale.max {
            return Err(failed(
                "refinement.score_scale",
                "min must be finite and below max",
            ));
        }
        if !scale.contains(r.target_aggregate) {
            return Err(failed(
                "refinement.target_aggregate",
                format!("must be within {}..={}", scale.min, scale.max),
            ));
        }
        if r.retry.initial_backoff_ms > r.retry.max_backoff_ms {
            return Err(failed(
                "refinement.retry.initial_backoff_ms",
                "must not exceed max_backoff_ms",
            ));
        }
        if self.oracle.timeout_secs == 0 {
            return Err(failed("oracle.timeout_secs", "must be greater than 0"));
        }
        Ok(())
    }

    /// Apply environment variable overrides through `lookup`.
    /// Pattern: `FIDELITY_FUZZY_THRESHOLD`, `FIDELITY_MAX_ITERATIONS`, etc.
    pub fn apply_env_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = lookup("FIDELITY_FUZZY_THRESHOLD") {
            self.quotes.fuzzy_threshold = parse_env("FIDELITY_FUZZY_THRESHOLD", &val)?;
        }
        if let Some(val) = lookup("FIDELITY_TARGET_AGGREGATE") {
            self.refinement.target_aggregate = parse_env("FIDELITY_TARGET_AGGREGATE", &val)?;
        }
        if let Some(val) = lookup("FIDELITY_MAX_ITERATIONS") {
            self.refinement.max_iterations = parse_env("FIDELITY_MAX_ITERATIONS", &val)?;
        }
        if let Some(val) = lookup("FIDELITY_LOOKAHEAD_WINDOW") {
            self.alignment.lookahead_window = parse_env("FIDELITY_LOOKAHEAD_WINDOW", &val)?;
        }
        if let Some(val) = lookup("FIDELITY_TOLERATED_CATEGORIES") {
            self.alignment.tolerated_categories = parse_categories(&val)?;
        }
        if let Some(val) = lookup("FIDELITY_ORACLE_ENDPOINT") {
            self.oracle.endpoint = Some(val);
        }
        Ok(())
    }

    /// Apply CLI overrides (highest priority).
    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(v) = cli.fuzzy_threshold {
            self.quotes.fuzzy_threshold = v;
        }
        if let Some(v) = cli.target_aggregate {
            self.refinement.target_aggregate = v;
        }
        if let Some(v) = cli.max_iterations {
            self.refinement.max_iterations = v;
        }
        if let Some(v) = cli.lookahead_window {
            self.alignment.lookahead_window = v;
        }
        if let Some(ref v) = cli.tolerated_categories {
            self.alignment.tolerated_categories = v.iter().copied().collect();
        }
        if let Some(ref v) = cli.oracle_endpoint {
            self.oracle.endpoint = Some(v.clone());
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn failed(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.into(),
    }
}

fn unit_interval(field: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(failed(field, "must be between 0.0 and 1.0"))
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, val: &str) -> Result<T, ConfigError> {
    val.trim().parse().map_err(|_| ConfigError::InvalidValue {
        field: key.to_string(),
        message: format!("cannot parse '{val}'"),
    })
}

/// Parse a comma-separated category list. An empty string tolerates nothing.
fn parse_categories(val: &str) -> Result<BTreeSet<InsertionCategory>, ConfigError> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<InsertionCategory>().map_err(|message| ConfigError::InvalidValue {
                field: "FIDELITY_TOLERATED_CATEGORIES".to_string(),
                message,
            })
        })
        .collect()
}
