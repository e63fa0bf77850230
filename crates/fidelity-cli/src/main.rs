use std::fs;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fidelity_core::observability::{init_tracing, LogFormat};
use fidelity_core::errors::{ConfigError, FidelityErrorCode, InputError, OracleError};
use fidelity_core::{FidelityError, IQualityOracle};
use fidelity_oracle::HttpOracle;
use fidelity_validation::{FidelityEngine, ReviewContext, ReviewMode};
use tracing::{info, warn};

mod cli;
mod output;
mod project;

use cli::{Cli, Commands, ReviewArgs};
use project::{resolve_config, Project};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(if cli.json {
        LogFormat::Json
    } else {
        LogFormat::Human
    });

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            match error_code(&err) {
                Some(code) => eprintln!("error [{code}]: {err:#}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::from(2)
        }
    }
}

/// Machine code of the first library error in the chain.
fn error_code(err: &anyhow::Error) -> Option<&'static str> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<FidelityError>() {
            Some(e.error_code())
        } else if let Some(e) = cause.downcast_ref::<ConfigError>() {
            Some(e.error_code())
        } else if let Some(e) = cause.downcast_ref::<InputError>() {
            Some(e.error_code())
        } else {
            cause.downcast_ref::<OracleError>().map(|e| e.error_code())
        }
    })
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Review(args) => review(args, cli.json),
        Commands::ShowConfig {
            project,
            config,
            overrides,
        } => {
            let config = resolve_config(
                project.as_deref(),
                config.as_deref(),
                &overrides.to_overrides(None),
            )?;
            output::print_config(&config, cli.json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn review(args: ReviewArgs, json: bool) -> Result<ExitCode> {
    let overrides = args.overrides.to_overrides(args.oracle_url.as_deref());
    let config = resolve_config(Some(&args.project), args.config.as_deref(), &overrides)?;
    let project = Project::load(&args.project, &config)?;

    let oracle = match &config.oracle.endpoint {
        Some(_) => Some(HttpOracle::from_config(&config.oracle)?),
        None => None,
    };
    let engine = FidelityEngine::new(config)?;
    let mode = ReviewMode::from(args.mode);

    let mut ctx = ReviewContext::new(mode, &project.source, &project.transformed)
        .with_quotes(&project.quotes);
    if let Some(draft) = &project.draft {
        ctx = ctx.with_draft(draft);
    }
    if let Some(rubric) = &project.rubric {
        ctx = ctx.with_rubric(rubric);
    }
    if let Some(oracle) = &oracle {
        ctx = ctx.with_oracle(oracle as &dyn IQualityOracle);
    }

    let report = engine
        .review(&ctx)
        .with_context(|| format!("review of {} failed", project.root.display()))?;
    output::write_json(&args.out, &report)?;
    info!(out = %args.out.display(), "report written");

    if let (Some(path), Some(refinement)) = (&args.revised_out, &report.refinement) {
        if refinement.revised {
            fs::write(path, refinement.final_draft())
                .with_context(|| format!("failed to write {}", path.display()))?;
        } else {
            warn!("draft was not revised; {} left untouched", path.display());
        }
    }

    output::print_report(&report, json)?;
    Ok(if report.passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
