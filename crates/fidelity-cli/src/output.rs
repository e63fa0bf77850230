use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use fidelity_core::FidelityConfig;
use fidelity_validation::FidelityReport;
use serde::Serialize;

/// Findings shown in the human summary; the report file has all of them.
const MAX_PRINTED_FINDINGS: usize = 10;

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body).with_context(|| format!("failed to write {}", path.display()))
}

pub fn print_report(report: &FidelityReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }
    println!("{}", report.summary());
    let findings = report.findings();
    for (kind, verdict, subject) in findings.iter().take(MAX_PRINTED_FINDINGS) {
        println!("  - [{verdict}] {kind:?}: {subject}");
    }
    if findings.len() > MAX_PRINTED_FINDINGS {
        println!("  ... {} more in the report", findings.len() - MAX_PRINTED_FINDINGS);
    }
    Ok(())
}

pub fn print_config(config: &FidelityConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
