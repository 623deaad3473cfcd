//! Group partition and sums-of-squares decomposition
//!
//! ANOVA and Tukey HSD both start from the same split of the outcome metric
//! by treatment group, so they share one pooled variance estimate.

use crate::dataset::Dataset;
use crate::error::{AnalysisError, Result};

/// Smallest group size for which a sample variance is defined
pub const MIN_GROUP_SIZE: usize = 2;

/// Outcome values for one treatment group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSample {
    pub group: u32,
    pub values: Vec<f64>,
}

impl GroupSample {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        mean(&self.values)
    }
}

/// One-way sums-of-squares decomposition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SumsOfSquares {
    pub ss_between: f64,
    pub ss_within: f64,
    pub df_between: usize,
    pub df_within: usize,
    pub grand_mean: f64,
}

impl SumsOfSquares {
    pub fn ms_between(&self) -> f64 {
        self.ss_between / self.df_between as f64
    }

    /// Pooled within-group variance (MSE)
    pub fn ms_within(&self) -> f64 {
        self.ss_within / self.df_within as f64
    }
}

/// Outcome metric split by treatment group, ascending by group id
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    groups: Vec<GroupSample>,
}

impl Partition {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let groups = dataset
            .sales_by_group()
            .into_iter()
            .map(|(group, values)| GroupSample { group, values })
            .collect();
        Self { groups }
    }

    /// Partition that satisfies the preconditions of ANOVA and Tukey HSD
    ///
    /// Requires at least two groups, at least [`MIN_GROUP_SIZE`] observations
    /// in every group, and non-zero pooled within-group variance.
    pub fn for_hypothesis_test(dataset: &Dataset) -> Result<(Self, SumsOfSquares)> {
        let partition = Self::from_dataset(dataset);

        if partition.groups.len() < 2 {
            return Err(AnalysisError::insufficient(format!(
                "need at least 2 treatment groups, found {}",
                partition.groups.len()
            )));
        }

        if let Some(small) = partition
            .groups
            .iter()
            .find(|g| g.len() < MIN_GROUP_SIZE)
        {
            return Err(AnalysisError::insufficient(format!(
                "group {} has {} observation(s), need at least {}",
                small.group,
                small.len(),
                MIN_GROUP_SIZE
            )));
        }

        let sums = partition.decompose();
        if !sums.ss_between.is_finite() || !sums.ss_within.is_finite() {
            return Err(AnalysisError::Distribution(
                "sums of squares are not finite".to_string(),
            ));
        }
        if partition.is_degenerate(&sums) {
            return Err(AnalysisError::insufficient(
                "within-group variance is zero; F statistic is undefined",
            ));
        }

        Ok((partition, sums))
    }

    pub fn groups(&self) -> &[GroupSample] {
        &self.groups
    }

    pub fn total_len(&self) -> usize {
        self.groups.iter().map(GroupSample::len).sum()
    }

    pub fn decompose(&self) -> SumsOfSquares {
        let n = self.total_len();
        let grand_mean = self
            .groups
            .iter()
            .flat_map(|g| g.values.iter())
            .sum::<f64>()
            / n as f64;

        let mut ss_between = 0.0;
        let mut ss_within = 0.0;
        for group in &self.groups {
            let group_mean = group.mean();
            ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
            ss_within += group
                .values
                .iter()
                .map(|x| (x - group_mean).powi(2))
                .sum::<f64>();
        }

        SumsOfSquares {
            ss_between,
            ss_within,
            df_between: self.groups.len().saturating_sub(1),
            df_within: n.saturating_sub(self.groups.len()),
            grand_mean,
        }
    }

    /// Within-group scatter is indistinguishable from rounding noise
    ///
    /// Each deviation from a group mean carries an error of a few ulps of the
    /// largest magnitude in the table, so the floor scales with that ulp
    /// squared, not with the raw sum of squares.
    fn is_degenerate(&self, sums: &SumsOfSquares) -> bool {
        let max_abs = self
            .groups
            .iter()
            .flat_map(|g| g.values.iter())
            .fold(0.0_f64, |acc, x| acc.max(x.abs()));
        let ulp = f64::EPSILON * max_abs;
        let noise_floor = 64.0 * self.total_len() as f64 * ulp * ulp;
        sums.ss_within <= noise_floor
    }
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Bessel-corrected sample variance; `None` below two observations
pub(crate) fn sample_variance(values: &[f64]) -> Option<f64> {
    if values.len() < MIN_GROUP_SIZE {
        return None;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
