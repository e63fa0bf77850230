use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fidelity_core::config::CliOverrides;
use fidelity_core::InsertionCategory;
use fidelity_validation::ReviewMode;
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(
    name = "fidelity",
    version,
    about = "Check that a transformed document stays faithful to its source"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Review a project directory and write the report.
    Review(ReviewArgs),
    /// Print the resolved configuration.
    ShowConfig {
        #[arg(long)]
        project: Option<PathBuf>,
        #[arg(long, help = "Config file used instead of <project>/fidelity.toml")]
        config: Option<PathBuf>,
        #[command(flatten)]
        overrides: OverrideArgs,
    },
}

#[derive(Args, Debug)]
pub struct ReviewArgs {
    #[arg(long, help = "Directory holding source.txt, formatted.md and friends")]
    pub project: PathBuf,
    #[arg(long, help = "Where to write the JSON report")]
    pub out: PathBuf,
    #[arg(long, value_enum, default_value_t = Mode::FormatOnly)]
    pub mode: Mode,
    #[arg(long, help = "Base URL of the quality oracle")]
    pub oracle_url: Option<String>,
    #[arg(long, help = "Config file used instead of <project>/fidelity.toml")]
    pub config: Option<PathBuf>,
    #[arg(long, help = "Write the final draft here when refinement revised it")]
    pub revised_out: Option<PathBuf>,
    #[command(flatten)]
    pub overrides: OverrideArgs,
}

#[derive(Args, Debug, Default)]
pub struct OverrideArgs {
    #[arg(long)]
    pub fuzzy_threshold: Option<f64>,
    #[arg(long, help = "Aggregate score a draft must reach")]
    pub target: Option<f64>,
    #[arg(long)]
    pub max_iterations: Option<u32>,
    #[arg(long)]
    pub lookahead: Option<usize>,
    #[arg(
        long,
        value_delimiter = ',',
        value_parser = parse_category,
        help = "Tolerated insertion categories, comma separated"
    )]
    pub tolerate: Option<Vec<InsertionCategory>>,
}

impl OverrideArgs {
    pub fn to_overrides(&self, oracle_url: Option<&str>) -> CliOverrides {
        CliOverrides {
            fuzzy_threshold: self.fuzzy_threshold,
            target_aggregate: self.target,
            max_iterations: self.max_iterations,
            lookahead_window: self.lookahead,
            tolerated_categories: self.tolerate.clone(),
            oracle_endpoint: oracle_url.map(str::to_string),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    FormatOnly,
    SemanticSinglePass,
    SemanticAllClaims,
}

impl From<Mode> for ReviewMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::FormatOnly => ReviewMode::FormatOnly,
            Mode::SemanticSinglePass => ReviewMode::SemanticSinglePass,
            Mode::SemanticAllClaims => ReviewMode::SemanticAllClaims,
        }
    }
}

fn parse_category(s: &str) -> Result<InsertionCategory, String> {
    s.trim().parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn review_parses_mode_and_overrides() {
        let cli = Cli::try_parse_from([
            "fidelity",
            "review",
            "--project",
            "p",
            "--out",
            "r.json",
            "--mode",
            "semantic-all-claims",
            "--tolerate",
            "heading,timestamp",
            "--target",
            "4.0",
        ])
        .unwrap();
        let Commands::Review(args) = cli.command else {
            panic!("expected review");
        };
        assert_eq!(ReviewMode::from(args.mode), ReviewMode::SemanticAllClaims);
        let overrides = args.overrides.to_overrides(Some("http://oracle"));
        assert_eq!(overrides.target_aggregate, Some(4.0));
        assert_eq!(
            overrides.tolerated_categories,
            Some(vec![InsertionCategory::Heading, InsertionCategory::Timestamp])
        );
        assert_eq!(overrides.oracle_endpoint.as_deref(), Some("http://oracle"));
    }

    #[test]
    fn unknown_category_is_rejected() {
        let parsed = Cli::try_parse_from([
            "fidelity", "review", "--project", "p", "--out", "r.json", "--tolerate", "emoji",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn out_is_required() {
        assert!(Cli::try_parse_from(["fidelity", "review", "--project", "p"]).is_err());
    }
}
