//! CSV output format for spreadsheet analysis
//!
//! Two tables: the per-promotion summary and the Tukey HSD comparisons,
//! separated by a blank line.

use crate::report::AnalysisReport;
use crate::summary::GroupSummary;
use crate::tukey::TukeyResult;
use anyhow::Result;

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8(bytes)?)
}

/// Summary statistics as CSV; an undefined standard deviation is an empty field
pub fn summary_csv(summaries: &[GroupSummary]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "Promotion",
        "Sample_Size",
        "Mean_Sales",
        "Std_Sales",
        "Total_Sales",
    ])?;

    for s in summaries {
        writer.write_record([
            s.group.to_string(),
            s.count.to_string(),
            format!("{:.2}", s.mean),
            s.std_dev.map(|sd| format!("{:.2}", sd)).unwrap_or_default(),
            format!("{:.2}", s.total),
        ])?;
    }

    finish(writer)
}

/// Tukey HSD comparisons as CSV
pub fn tukey_csv(tukey: &TukeyResult) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "group1", "group2", "meandiff", "p-adj", "lower", "upper", "reject",
    ])?;

    for c in &tukey.comparisons {
        writer.write_record([
            c.group_a.to_string(),
            c.group_b.to_string(),
            format!("{:.4}", c.mean_diff),
            format!("{:.4}", c.p_adj),
            format!("{:.4}", c.lower),
            format!("{:.4}", c.upper),
            c.reject.to_string(),
        ])?;
    }

    finish(writer)
}

/// Both tables, summary first
pub fn to_csv(report: &AnalysisReport) -> Result<String> {
    let mut output = summary_csv(&report.summaries)?;
    output.push('\n');
    output.push_str(&tukey_csv(&report.tukey)?);
    Ok(output)
}
