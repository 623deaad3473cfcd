//! Winning-campaign recommendation derived from group summaries

use crate::error::{AnalysisError, Result};
use crate::partition::round_to;
use crate::summary::{GroupSummary, SUMMARY_DECIMALS};
use serde::Serialize;

/// Best and worst promotion by mean sales, and the lift between them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusinessInsight {
    pub best_group: u32,
    pub worst_group: u32,
    /// best mean - worst mean, in thousands
    pub revenue_lift: f64,
}

/// Pick the best and worst promotion from `summaries`
///
/// Ties go to the lowest promotion id, whatever the input order.
pub fn derive_insight(summaries: &[GroupSummary]) -> Result<BusinessInsight> {
    let mut ordered: Vec<&GroupSummary> = summaries.iter().collect();
    ordered.sort_by_key(|s| s.group);
    ordered.dedup_by_key(|s| s.group);

    if ordered.len() < 2 {
        return Err(AnalysisError::insufficient(format!(
            "need at least 2 treatment groups to rank, found {}",
            ordered.len()
        )));
    }

    let mut best = ordered[0];
    let mut worst = ordered[0];
    for summary in &ordered[1..] {
        if summary.mean > best.mean {
            best = summary;
        }
        if summary.mean < worst.mean {
            worst = summary;
        }
    }

    let insight = BusinessInsight {
        best_group: best.group,
        worst_group: worst.group,
        revenue_lift: round_to(best.mean - worst.mean, SUMMARY_DECIMALS),
    };
    tracing::info!(
        best = insight.best_group,
        worst = insight.worst_group,
        lift = insight.revenue_lift,
        "derived business insight"
    );
    Ok(insight)
}
