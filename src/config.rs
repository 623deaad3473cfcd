//! Configuration for an analysis run (abdash.toml)
//!
//! Precedence: built-in defaults, then the TOML file, then explicit CLI flags.
//! The ANOVA significance threshold is fixed and deliberately absent here.

use crate::cli::{Cli, OutputFormat};
use crate::dataset::DEFAULT_DATA_PATH;
use crate::tukey::DEFAULT_ALPHA;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings for one analysis run
///
/// # Example TOML
///
/// ```toml
/// data_path = "data/AB_data.csv"
/// alpha = 0.05
/// format = "html"
/// show_raw = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Experiment table to load
    pub data_path: PathBuf,

    /// Family-wise error rate for the Tukey HSD intervals
    ///
    /// - 0.05 (default): 95% simultaneous confidence intervals
    /// - 0.01: stricter, fewer pairs declared different
    pub alpha: f64,

    /// Dashboard output format
    pub format: OutputFormat,

    /// Append the raw observations to text/HTML reports
    pub show_raw: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            alpha: DEFAULT_ALPHA,
            format: OutputFormat::Text,
            show_raw: false,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file
    ///
    /// ```no_run
    /// use abdash::config::AnalysisConfig;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = AnalysisConfig::from_file("abdash.toml")?;
    /// println!("Analyzing {}", config.data_path.display());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML")
    }

    /// Resolve the effective configuration for a command line
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        config.validate().map_err(anyhow::Error::msg)?;
        Ok(config)
    }

    /// Overlay explicitly passed CLI flags
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(data) = &cli.data {
            self.data_path = data.clone();
        }
        if let Some(alpha) = cli.alpha {
            self.alpha = alpha;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if cli.show_raw {
            self.show_raw = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(format!("alpha must be in (0, 1), got {}", self.alpha));
        }

        if self.data_path.as_os_str().is_empty() {
            return Err("data_path must not be empty".to_string());
        }

        Ok(())
    }
}
