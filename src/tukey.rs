//! Tukey HSD post-hoc comparison (Tukey-Kramer for unequal group sizes)
//!
//! Every unordered pair of promotions is compared with simultaneous
//! confidence intervals at a family-wise error rate `alpha`. The pooled
//! variance is the ANOVA within-group mean square, so both tests agree on
//! the same sums of squares.

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use crate::partition::Partition;
use crate::studentized_range::{ptukey, qtukey};
use serde::Serialize;

/// Default family-wise error rate
pub const DEFAULT_ALPHA: f64 = 0.05;

/// One pairwise comparison, `group_a < group_b`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TukeyComparison {
    pub group_a: u32,
    pub group_b: u32,
    /// mean(group_b) - mean(group_a)
    pub mean_diff: f64,
    /// sqrt(MSE / 2 * (1/n_a + 1/n_b)), the studentized range scale
    pub std_error: f64,
    /// Studentized range critical value for k groups and N - k df
    pub q_critical: f64,
    pub lower: f64,
    pub upper: f64,
    /// Family-wise adjusted p-value
    pub p_adj: f64,
    /// True iff the confidence interval excludes zero
    pub reject: bool,
}

/// All pairwise comparisons at one family-wise error rate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TukeyResult {
    pub alpha: f64,
    /// Number of groups compared
    pub groups: usize,
    pub df_within: usize,
    /// Pooled within-group variance shared with the ANOVA
    pub ms_within: f64,
    pub q_critical: f64,
    pub comparisons: Vec<TukeyComparison>,
}

impl TukeyResult {
    /// Comparison for an unordered pair, if both groups were present
    pub fn pair(&self, a: u32, b: u32) -> Option<&TukeyComparison> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.comparisons
            .iter()
            .find(|c| c.group_a == lo && c.group_b == hi)
    }

    /// Pairs whose difference is significant at `alpha`
    pub fn rejected(&self) -> impl Iterator<Item = &TukeyComparison> {
        self.comparisons.iter().filter(|c| c.reject)
    }
}

/// Pairwise Tukey HSD over every promotion present in `dataset`
///
/// Shares the minimum group size and zero-variance guards of [`crate::anova::anova`].
pub fn tukey_hsd(dataset: &Dataset, alpha: f64) -> Result<TukeyResult> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(AnalysisError::Config(format!(
            "alpha must lie in (0, 1), got {}",
            alpha
        )));
    }

    let (partition, sums) = Partition::for_hypothesis_test(dataset)?;
    let groups = partition.groups();
    let k = groups.len();
    let df = sums.df_within as f64;
    let mse = sums.ms_within();
    let q_critical = qtukey(1.0 - alpha, k, df)?;

    let means: Vec<f64> = groups.iter().map(|g| g.mean()).collect();
    let mut comparisons = Vec::with_capacity(k * (k - 1) / 2);

    for i in 0..k {
        for j in (i + 1)..k {
            let (a, b) = (&groups[i], &groups[j]);
            let mean_diff = means[j] - means[i];
            let std_error = (mse / 2.0 * (1.0 / a.len() as f64 + 1.0 / b.len() as f64)).sqrt();
            let margin = q_critical * std_error;
            let lower = mean_diff - margin;
            let upper = mean_diff + margin;
            let p_adj = (1.0 - ptukey(mean_diff.abs() / std_error, k, df)?).clamp(0.0, 1.0);

            comparisons.push(TukeyComparison {
                group_a: a.group,
                group_b: b.group,
                mean_diff,
                std_error,
                q_critical,
                lower,
                upper,
                p_adj,
                reject: lower > 0.0 || upper < 0.0,
            });
        }
    }

    tracing::debug!(
        pairs = comparisons.len(),
        rejected = comparisons.iter().filter(|c| c.reject).count(),
        q_critical,
        "Tukey HSD"
    );

    Ok(TukeyResult {
        alpha,
        groups: k,
        df_within: sums.df_within,
        ms_within: mse,
        q_critical,
        comparisons,
    })
}
