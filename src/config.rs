//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.duriantrack.toml` files.

use crate::i18n::Locale;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Path of the JSON data file.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Display language for reports and exports.
    #[serde(default)]
    pub locale: Locale,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            locale: Locale::default(),
            verbose: false,
        }
    }
}

fn default_data_file() -> String {
    "farm_data.json".to_string()
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Default report output file path.
    #[serde(default = "default_report_output")]
    pub output: String,

    /// Include the growth trend section in the report.
    #[serde(default = "default_true")]
    pub include_growth: bool,

    /// Include the task schedule section in the report.
    #[serde(default = "default_true")]
    pub include_tasks: bool,

    /// Maximum upcoming tasks listed in the report.
    #[serde(default = "default_max_tasks")]
    pub max_tasks: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_report_output(),
            include_growth: true,
            include_tasks: true,
            max_tasks: default_max_tasks(),
        }
    }
}

fn default_report_output() -> String {
    "farm_report.md".to_string()
}

fn default_true() -> bool {
    true
}

fn default_max_tasks() -> usize {
    10
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
        let default_path = Path::new(".duriantrack.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data_file) = args.data_file {
            self.general.data_file = data_file.display().to_string();
        }
        if let Some(locale) = args.locale {
            self.general.locale = locale;
        }
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
