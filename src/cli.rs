//! CLI argument parsing for abdash

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format for the analysis dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text dashboard (default)
    #[default]
    Text,
    /// JSON format for machine parsing
    Json,
    /// CSV summary table for spreadsheet analysis
    Csv,
    /// Standalone HTML report with charts
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "abdash")]
#[command(version)]
#[command(
    about = "Analyze a three-campaign marketing A/B test: summaries, ANOVA, Tukey HSD and a recommendation",
    long_about = None
)]
pub struct Cli {
    /// Experiment table to analyze (default: data/AB_data.csv)
    #[arg(short = 'd', long = "data", value_name = "PATH")]
    pub data: Option<PathBuf>,

    /// Load settings from a TOML file; explicit flags take precedence
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum)]
    pub format: Option<OutputFormat>,

    /// Family-wise error rate for the Tukey HSD intervals (default: 0.05)
    #[arg(long = "alpha", value_name = "ALPHA")]
    pub alpha: Option<f64>,

    /// Print the dataset overview (shape, columns, missing values) first
    #[arg(long = "inspect")]
    pub inspect: bool,

    /// Append the raw observations to the report
    #[arg(long = "show-raw")]
    pub show_raw: bool,

    /// Enable debug logging on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}
