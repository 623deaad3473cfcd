//! Full analysis run and the plain-text dashboard
//!
//! `AnalysisReport` runs every analysis once over a dataset. The text,
//! JSON, CSV and HTML renderers all read from it.

use crate::anova::{anova, AnovaResult, SIGNIFICANCE_LEVEL};
use crate::breakdown::{
    group_distributions, market_means, weekly_means, GroupDistribution, MarketMean, WeeklyMean,
};
use crate::dataset::{Dataset, DatasetOverview, Observation};
use crate::error::Result;
use crate::insight::{derive_insight, BusinessInsight};
use crate::summary::{summarize, GroupSummary};
use crate::tukey::{tukey_hsd, TukeyResult};
use serde::Serialize;

/// Every analysis result for one dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub overview: DatasetOverview,
    pub summaries: Vec<GroupSummary>,
    pub anova: AnovaResult,
    pub tukey: TukeyResult,
    pub insight: BusinessInsight,
    pub weekly: Vec<WeeklyMean>,
    pub markets: Vec<MarketMean>,
    pub distributions: Vec<GroupDistribution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<Vec<Observation>>,
}

impl AnalysisReport {
    /// Run summaries, ANOVA, Tukey HSD (at `alpha`) and the insight
    ///
    /// Any failing analysis fails the whole report.
    pub fn build(dataset: &Dataset, alpha: f64) -> Result<Self> {
        let summaries = summarize(dataset);
        let insight = derive_insight(&summaries)?;
        let anova = anova(dataset)?;
        let tukey = tukey_hsd(dataset, alpha)?;

        Ok(Self {
            overview: dataset.inspect(),
            summaries,
            anova,
            tukey,
            insight,
            weekly: weekly_means(dataset),
            markets: market_means(dataset),
            distributions: group_distributions(dataset),
            raw: None,
        })
    }

    /// Attach the raw observations for display
    pub fn with_raw(mut self, dataset: &Dataset) -> Self {
        self.raw = Some(dataset.observations().to_vec());
        self
    }

    /// Key findings and the roll-out recommendation, one line each
    pub fn recommendations(&self) -> Vec<String> {
        let best = self.insight.best_group;
        let worst = self.insight.worst_group;
        let lift = self.insight.revenue_lift;
        let mut lines = Vec::new();

        if self.anova.significant {
            lines.push(format!(
                "Promotion {} is the clear winner with ${:.2}k higher average sales than Promotion {}",
                best, lift, worst
            ));
            lines.push(format!(
                "Statistical tests confirm significant differences between promotions (p < {})",
                SIGNIFICANCE_LEVEL
            ));
        } else {
            lines.push(format!(
                "Promotion {} has the highest average sales, ${:.2}k above Promotion {}",
                best, lift, worst
            ));
            lines.push(format!(
                "No significant difference between promotions (p >= {}); the lift may be noise",
                SIGNIFICANCE_LEVEL
            ));
        }

        if let Some(pair) = self.tukey.pair(best, worst) {
            if pair.reject {
                lines.push(format!(
                    "Tukey HSD confirms Promotion {} outperforms Promotion {} (p-adj {:.4})",
                    best, worst, pair.p_adj
                ));
            } else {
                lines.push(format!(
                    "Tukey HSD cannot separate Promotion {} from Promotion {} (p-adj {:.4})",
                    best, worst, pair.p_adj
                ));
            }
        }

        if self.anova.significant {
            lines.push(format!(
                "Recommendation: Roll out Promotion {} company-wide",
                best
            ));
        } else {
            lines.push(
                "Recommendation: Keep testing before committing to a single promotion".to_string(),
            );
        }

        lines
    }

    /// Render the dashboard as plain text
    pub fn to_text(&self, include_overview: bool) -> String {
        let mut out = String::new();

        out.push_str("=== Fast-Food Marketing Campaign A/B Test Analysis ===\n\n");
        out.push_str(&format!(
            "Total observations: {}   Best promotion: Promotion {}   Revenue lift: ${:.2}k\n",
            self.overview.rows, self.insight.best_group, self.insight.revenue_lift
        ));

        if include_overview {
            out.push('\n');
            out.push_str(&format_overview(&self.overview));
        }

        out.push_str("\nSUMMARY STATISTICS:\n");
        out.push_str(&format_summary_table(&self.summaries));

        out.push_str("\nSALES BY WEEK (mean, thousands):\n");
        out.push_str(&format!("{:>6} {:>10} {:>10}\n", "week", "Promotion", "Mean"));
        for cell in &self.weekly {
            out.push_str(&format!("{:>6} {:>10} {:>10.2}\n", cell.week, cell.group, cell.mean));
        }

        out.push_str("\nSALES BY MARKET SIZE (mean, thousands):\n");
        out.push_str(&format!("{:>10} {:>10} {:>10}\n", "MarketSize", "Promotion", "Mean"));
        for cell in &self.markets {
            out.push_str(&format!(
                "{:>10} {:>10} {:>10.2}\n",
                cell.market_size, cell.group, cell.mean
            ));
        }

        out.push_str("\nSALES DISTRIBUTION BY PROMOTION:\n");
        out.push_str(&format!(
            "{:>9} {:>9} {:>9} {:>9} {:>9} {:>9}\n",
            "Promotion", "Min", "Q1", "Median", "Q3", "Max"
        ));
        for d in &self.distributions {
            out.push_str(&format!(
                "{:>9} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2}\n",
                d.group, d.min, d.q1, d.median, d.q3, d.max
            ));
        }

        out.push_str("\nSTATISTICAL TESTS:\n");
        out.push_str(&format!("ANOVA F-statistic: {}\n", self.anova.f_statistic));
        out.push_str(&format!("P-value: {}\n", self.anova.p_value));
        out.push_str(&format!(
            "Significant difference: {}\n",
            if self.anova.significant { "Yes" } else { "No" }
        ));
        out.push('\n');
        out.push_str(&format_tukey_table(&self.tukey));

        out.push_str("\nBUSINESS RECOMMENDATIONS:\n");
        for line in self.recommendations() {
            out.push_str(&format!("- {}\n", line));
        }

        if let Some(raw) = &self.raw {
            out.push_str("\nRAW DATA:\n");
            out.push_str(&format_raw_table(raw));
        }

        out
    }
}

/// Shape, columns, missing values and group counts
pub fn format_overview(overview: &DatasetOverview) -> String {
    let mut out = String::new();
    out.push_str("DATASET OVERVIEW:\n");
    out.push_str(&format!("Shape: ({}, {})\n", overview.rows, overview.columns));
    out.push_str(&format!("Columns: {}\n", overview.column_names.join(", ")));

    let missing: Vec<String> = overview
        .missing_values
        .iter()
        .map(|m| format!("{}: {}", m.column, m.missing))
        .collect();
    out.push_str(&format!("Missing values: {}\n", missing.join(", ")));

    let counts: Vec<String> = overview
        .group_counts
        .iter()
        .map(|(group, count)| format!("{}: {}", group, count))
        .collect();
    out.push_str(&format!("Promotion distribution: {}\n", counts.join(", ")));
    out
}

/// Summary table with one row per promotion; undefined deviations print as NaN
pub fn format_summary_table(summaries: &[GroupSummary]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>9} {:>11} {:>10} {:>9} {:>11}\n",
        "Promotion", "Sample_Size", "Mean_Sales", "Std_Sales", "Total_Sales"
    ));
    for s in summaries {
        let std_dev = match s.std_dev {
            Some(sd) => format!("{:.2}", sd),
            None => "NaN".to_string(),
        };
        out.push_str(&format!(
            "{:>9} {:>11} {:>10.2} {:>9} {:>11.2}\n",
            s.group, s.count, s.mean, std_dev, s.total
        ));
    }
    out
}

/// Pairwise comparison table in the conventional Tukey HSD layout
pub fn format_tukey_table(tukey: &TukeyResult) -> String {
    let mut out = String::new();
    let header = format!(
        "{:>6} {:>6} {:>9} {:>7} {:>9} {:>9} {:>6}",
        "group1", "group2", "meandiff", "p-adj", "lower", "upper", "reject"
    );
    out.push_str(&format!(
        "Multiple Comparison of Means - Tukey HSD, FWER={:.2}\n",
        tukey.alpha
    ));
    out.push_str(&format!("{}\n", "=".repeat(header.len())));
    out.push_str(&format!("{}\n", header));
    out.push_str(&format!("{}\n", "-".repeat(header.len())));
    for c in &tukey.comparisons {
        out.push_str(&format!(
            "{:>6} {:>6} {:>9.4} {:>7.4} {:>9.4} {:>9.4} {:>6}\n",
            c.group_a,
            c.group_b,
            c.mean_diff,
            c.p_adj,
            c.lower,
            c.upper,
            if c.reject { "True" } else { "False" }
        ));
    }
    out.push_str(&format!("{}\n", "-".repeat(header.len())));
    out
}

fn format_raw_table(raw: &[Observation]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>9} {:>10} {:>10} {:>4} {:>16}\n",
        "Promotion", "MarketSize", "LocationID", "week", "SalesInThousands"
    ));
    for obs in raw {
        out.push_str(&format!(
            "{:>9} {:>10} {:>10} {:>4} {:>16.2}\n",
            obs.promotion, obs.market_size, obs.location_id, obs.week, obs.sales
        ));
    }
    out
}
