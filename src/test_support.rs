//! Fixtures shared by unit tests

use crate::dataset::{Dataset, MarketSize, Observation};

/// Build a dataset from `(promotion, sales values)` pairs
pub(crate) fn dataset(groups: &[(u32, Vec<f64>)]) -> Dataset {
    let mut rows = Vec::new();
    for (group, values) in groups {
        for (i, v) in values.iter().enumerate() {
            rows.push(Observation {
                promotion: *group,
                sales: *v,
                market_size: MarketSize::ALL[i % 3],
                location_id: i as u32 + 1,
                week: (i % 4) as u32 + 1,
                market_id: None,
                age_of_store: None,
            });
        }
    }
    Dataset::from_observations(rows)
}

/// `n` values alternating `mean - spread` / `mean + spread`
pub(crate) fn alternating(mean: f64, spread: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| if i % 2 == 0 { mean - spread } else { mean + spread })
        .collect()
}
