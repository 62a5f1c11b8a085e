//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::ScoreKey;
use clap::Parser;
use std::path::PathBuf;

/// BpSummary - score and classify business-process entities
///
/// Computes scope, relevance, homogeneity, automatization, code quality
/// and security summaries for every process, step and group of a
/// dataset. Markdown/JSON reports.
///
/// Examples:
///   bpsummary --input dataset.json
///   bpsummary --input dataset.json --format json -o summary.json
///   bpsummary --input dataset.json --fail-on low
///   bpsummary --input dataset.json --dry-run
///   bpsummary --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Dataset JSON file with locations, processes, steps and groups
    #[arg(short, long, value_name = "FILE", required_unless_present = "init_config")]
    pub input: Option<PathBuf>,

    /// Output file path for the report
    ///
    /// Defaults to the config file setting (bpsummary_report.md).
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .bpsummary.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "BPSUMMARY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Fail if any summary item is at or below this level
    ///
    /// Useful for CI pipelines. Exit code 2 when the threshold is hit.
    /// Values: very-low, low, medium, high, very-high
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<LevelArg>,

    /// Number of lowest-scoring items listed in the report
    #[arg(long, value_name = "COUNT")]
    pub lowest: Option<usize>,

    /// List entities that produced no summary item
    #[arg(long)]
    pub include_empty: bool,

    /// Dry run: load and validate the dataset without computing summaries
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .bpsummary.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

/// Score level for --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum LevelArg {
    VeryLow,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl From<LevelArg> for ScoreKey {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::VeryLow => ScoreKey::VeryLow,
            LevelArg::Low => ScoreKey::Low,
            LevelArg::Medium => ScoreKey::Medium,
            LevelArg::High => ScoreKey::High,
            LevelArg::VeryHigh => ScoreKey::VeryHigh,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        let Some(ref input) = self.input else {
            return Err("An input dataset is required (--input)".to_string());
        };

        if !input.exists() {
            return Err(format!("Input dataset does not exist: {}", input.display()));
        }
        if !input.is_file() {
            return Err(format!("Input path is not a file: {}", input.display()));
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.lowest == Some(0) {
            return Err("--lowest must be at least 1".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; `--quiet` wins
    /// over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
