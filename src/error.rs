//! Error taxonomy for the analysis core
//!
//! Every failure is surfaced to the caller. Statistical results never fall
//! back to zero or NaN placeholders.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading a dataset or computing a statistic
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("Schema mismatch: missing column(s) {missing:?} (found {found:?})")]
    Schema {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Malformed row at line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Insufficient data: {reason}")]
    InsufficientData { reason: String },

    #[error("Distribution error: {0}")]
    Distribution(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    pub(crate) fn insufficient(reason: impl Into<String>) -> Self {
        Self::InsufficientData {
            reason: reason.into(),
        }
    }
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
