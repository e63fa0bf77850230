//! Loading a review project directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use fidelity_core::config::CliOverrides;
use fidelity_core::models::{Quote, Rubric};
use fidelity_core::FidelityConfig;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Resolve the configuration: defaults, then the config file, then
/// `FIDELITY_*` variables, then flags.
///
/// An explicit `config_file` replaces `<project>/fidelity.toml`.
pub fn resolve_config(
    project: Option<&Path>,
    config_file: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<FidelityConfig> {
    let config = match (config_file, project) {
        (Some(path), _) => {
            let mut config = FidelityConfig::load_file(path)?;
            config.apply_env_overrides(|key| std::env::var(key).ok())?;
            config.apply_cli_overrides(overrides);
            config.validate()?;
            config
        }
        (None, Some(root)) => FidelityConfig::load(root, Some(overrides))?,
        (None, None) => {
            let mut config = FidelityConfig::default();
            config.apply_env_overrides(|key| std::env::var(key).ok())?;
            config.apply_cli_overrides(overrides);
            config.validate()?;
            config
        }
    };
    Ok(config)
}

/// The documents of one review project.
#[derive(Debug)]
pub struct Project {
    pub root: PathBuf,
    pub source: String,
    pub transformed: String,
    pub quotes: Vec<Quote>,
    pub draft: Option<String>,
    pub rubric: Option<Rubric>,
}

impl Project {
    /// Read the project files named by `config.project`. The source and
    /// transformed documents are required; the rest are optional.
    pub fn load(root: &Path, config: &FidelityConfig) -> Result<Self> {
        if !root.is_dir() {
            bail!("project directory {} does not exist", root.display());
        }
        let files = &config.project;
        let source = read_required(&root.join(&files.source_file))?;
        let transformed = read_required(&root.join(&files.transformed_file))?;
        let quotes: Vec<Quote> = read_json(&root.join(&files.quotes_file))?.unwrap_or_default();
        let draft = read_optional(&root.join(&files.draft_file))?;
        let rubric: Option<Rubric> = read_json(&root.join(&files.rubric_file))?;
        if let Some(rubric) = &rubric {
            rubric
                .validate()
                .with_context(|| format!("invalid rubric in {}", files.rubric_file))?;
        }

        debug!(
            project = %root.display(),
            quotes = quotes.len(),
            has_draft = draft.is_some(),
            has_rubric = rubric.is_some(),
            "project loaded"
        );
        Ok(Self {
            root: root.to_path_buf(),
            source,
            transformed,
            quotes,
            draft,
            rubric,
        })
    }
}

fn read_required(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }
    read_required(path).map(Some)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let Some(raw) = read_optional(path)? else {
        return Ok(None);
    };
    let value = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(Some(value))
}
