//! One-way analysis of variance across treatment groups
//!
//! Null hypothesis: every promotion has the same mean sales. The F statistic
//! is the ratio of between-group to within-group mean squares and its
//! p-value comes from the F distribution with (k - 1, N - k) degrees of
//! freedom.

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};
use crate::partition::{round_to, Partition};
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Fixed significance threshold for the omnibus test
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Decimal places of the reported F statistic and p-value
pub const ANOVA_DECIMALS: i32 = 4;

/// Outcome of the one-way ANOVA
///
/// `f_statistic` and `p_value` are rounded for reporting; `significant` is
/// decided on the unrounded p-value. The remaining fields form the full
/// ANOVA table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnovaResult {
    pub f_statistic: f64,
    pub p_value: f64,
    pub significant: bool,
    pub df_between: usize,
    pub df_within: usize,
    pub ss_between: f64,
    pub ss_within: f64,
    pub ms_between: f64,
    pub ms_within: f64,
}

/// Test whether mean sales differ between promotions
///
/// Fails with `InsufficientData` when fewer than two groups are present,
/// when any group has fewer than two observations, or when there is no
/// within-group variance.
pub fn anova(dataset: &Dataset) -> Result<AnovaResult> {
    let (_, sums) = Partition::for_hypothesis_test(dataset)?;

    let ms_between = sums.ms_between();
    let ms_within = sums.ms_within();
    let f_statistic = ms_between / ms_within;

    let distribution = FisherSnedecor::new(sums.df_between as f64, sums.df_within as f64)
        .map_err(|e| AnalysisError::Distribution(e.to_string()))?;
    let p_value = distribution.sf(f_statistic).clamp(0.0, 1.0);

    tracing::debug!(
        f = f_statistic,
        p = p_value,
        df_between = sums.df_between,
        df_within = sums.df_within,
        "one-way ANOVA"
    );

    Ok(AnovaResult {
        f_statistic: round_to(f_statistic, ANOVA_DECIMALS),
        p_value: round_to(p_value, ANOVA_DECIMALS),
        significant: p_value < SIGNIFICANCE_LEVEL,
        df_between: sums.df_between,
        df_within: sums.df_within,
        ss_between: sums.ss_between,
        ss_within: sums.ss_within,
        ms_between,
        ms_within,
    })
}
