//! JSON output format for analysis reports

use crate::report::AnalysisReport;
use serde::Serialize;

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Input file the report was computed from
    pub data_source: String,
    /// Business recommendation lines, as shown on the dashboard
    pub recommendations: Vec<String>,
    #[serde(flatten)]
    pub report: &'a AnalysisReport,
}

impl<'a> JsonOutput<'a> {
    /// Wrap a report for serialization
    pub fn new(report: &'a AnalysisReport, data_source: impl Into<String>) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "abdash-json-v1".to_string(),
            data_source: data_source.into(),
            recommendations: report.recommendations(),
            report,
        }
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
