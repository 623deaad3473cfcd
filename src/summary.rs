//! Per-group descriptive statistics of the outcome metric

use crate::dataset::Dataset;
use crate::partition::{mean, round_to, sample_variance};
use serde::Serialize;

/// Decimal places applied to every reported summary figure
pub const SUMMARY_DECIMALS: i32 = 2;

/// Descriptive statistics for one treatment group
///
/// Figures are rounded for display. Downstream tests recompute from the
/// raw dataset instead of reusing these values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: u32,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` when the group has one observation
    pub std_dev: Option<f64>,
    pub total: f64,
}

/// Summarize the outcome metric for every promotion present, ascending by id
///
/// An empty dataset yields an empty summary.
pub fn summarize(dataset: &Dataset) -> Vec<GroupSummary> {
    let summaries: Vec<GroupSummary> = dataset
        .sales_by_group()
        .into_iter()
        .map(|(group, values)| GroupSummary {
            group,
            count: values.len(),
            mean: round_to(mean(&values), SUMMARY_DECIMALS),
            std_dev: sample_variance(&values).map(|v| round_to(v.sqrt(), SUMMARY_DECIMALS)),
            total: round_to(values.iter().sum(), SUMMARY_DECIMALS),
        })
        .collect();

    tracing::debug!(groups = summaries.len(), "summarized treatment groups");
    summaries
}
