//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.bpsummary.toml` files.

use crate::locations::TOP_REGION_PATH;
use crate::text::MessageCatalog;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".bpsummary.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Location tree settings.
    #[serde(default)]
    pub locations: LocationsConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Message templates used to resolve derived text.
    #[serde(default = "default_messages")]
    pub messages: BTreeMap<String, String>,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            verbose: false,
        }
    }
}

fn default_output() -> String {
    "bpsummary_report.md".to_string()
}

/// Location tree settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationsConfig {
    /// Path value marking top-level regions.
    #[serde(default = "default_top_region_path")]
    pub top_region_path: String,
}

impl Default for LocationsConfig {
    fn default() -> Self {
        Self {
            top_region_path: default_top_region_path(),
        }
    }
}

fn default_top_region_path() -> String {
    TOP_REGION_PATH.to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Include description parameters in the report.
    #[serde(default = "default_true")]
    pub include_params: bool,

    /// List entities that produced no summary item.
    #[serde(default)]
    pub include_empty: bool,

    /// Number of lowest-scoring items to list.
    #[serde(default = "default_lowest_count")]
    pub lowest_count: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            include_params: true,
            include_empty: false,
            lowest_count: default_lowest_count(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_lowest_count() -> usize {
    10
}

fn default_messages() -> BTreeMap<String, String> {
    [
        ("general__business_process", "business process"),
        ("general__business_processes", "business processes"),
        ("general__business_process_group", "business process group"),
        ("general__business_process_groups", "business process groups"),
        ("general__business_process_step", "business process step"),
        ("general__business_process_steps", "business process steps"),
        (
            "business_process_summary__scope_numberOfLocationsText",
            "{{locationsLinked}} of {{totalLocations}} locations",
        ),
        (
            "business_process_summary__relevance_numberOfUsersText",
            "{{numberOfUsersLinked}} users against an average of {{avgNumberOfUsers}} per {{entityName}}",
        ),
        ("business_process_summary__scope_title", "Scope"),
        ("business_process_summary__relevance_title", "Relevance"),
        ("business_process_summary__homogeneity_title", "Homogeneity"),
        ("business_process_summary__automatization_title", "Automatization"),
        ("business_process_summary__codequality_title", "Code quality"),
        ("business_process_summary__security_title", "Security"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            locations: LocationsConfig::default(),
            report: ReportConfig::default(),
            messages: default_messages(),
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(count) = args.lowest {
            self.report.lowest_count = count;
        }

        if args.include_empty {
            self.report.include_empty = true;
        }

        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Message catalog built from the `[messages]` table.
    pub fn catalog(&self) -> MessageCatalog {
        MessageCatalog::new(self.messages.clone())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
