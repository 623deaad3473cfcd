//! Chart data: weekly trend, market-size split and per-group distribution

use crate::dataset::{Dataset, MarketSize};
use crate::partition::{mean, round_to};
use crate::summary::SUMMARY_DECIMALS;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean sales for one (week, promotion) cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyMean {
    pub week: u32,
    pub group: u32,
    pub mean: f64,
}

/// Mean sales for one (market size, promotion) cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketMean {
    pub market_size: MarketSize,
    pub group: u32,
    pub mean: f64,
}

/// Five-number summary of one promotion's sales (box plot)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDistribution {
    pub group: u32,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

fn cell_means<K: Ord + Copy>(cells: BTreeMap<K, Vec<f64>>) -> impl Iterator<Item = (K, f64)> {
    cells
        .into_iter()
        .map(|(key, values)| (key, round_to(mean(&values), SUMMARY_DECIMALS)))
}

/// Mean sales per week and promotion, ordered by week then promotion
pub fn weekly_means(dataset: &Dataset) -> Vec<WeeklyMean> {
    let mut cells: BTreeMap<(u32, u32), Vec<f64>> = BTreeMap::new();
    for obs in dataset.iter() {
        cells
            .entry((obs.week, obs.promotion))
            .or_default()
            .push(obs.sales);
    }

    cell_means(cells)
        .map(|((week, group), mean)| WeeklyMean { week, group, mean })
        .collect()
}

/// Mean sales per market size and promotion, ordered Small < Medium < Large
pub fn market_means(dataset: &Dataset) -> Vec<MarketMean> {
    let mut cells: BTreeMap<(MarketSize, u32), Vec<f64>> = BTreeMap::new();
    for obs in dataset.iter() {
        cells
            .entry((obs.market_size, obs.promotion))
            .or_default()
            .push(obs.sales);
    }

    cell_means(cells)
        .map(|((market_size, group), mean)| MarketMean {
            market_size,
            group,
            mean,
        })
        .collect()
}

/// Linear-interpolation percentile over sorted data
fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }

    let index = (pct / 100.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = index - lower as f64;
        sorted[lower] * (1.0 - weight) + sorted[upper] * weight
    }
}

/// Box-plot summary per promotion, ascending by id
pub fn group_distributions(dataset: &Dataset) -> Vec<GroupDistribution> {
    dataset
        .sales_by_group()
        .into_iter()
        .map(|(group, mut values)| {
            values.sort_by(f64::total_cmp);
            GroupDistribution {
                group,
                min: values[0],
                q1: percentile(&values, 25.0),
                median: percentile(&values, 50.0),
                q3: percentile(&values, 75.0),
                max: values[values.len() - 1],
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Observation;

    fn obs(promotion: u32, week: u32, market_size: MarketSize, sales: f64) -> Observation {
        Observation {
            promotion,
            sales,
            market_size,
            location_id: 1,
            week,
            market_id: None,
            age_of_store: None,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_observations(vec![
            obs(2, 1, MarketSize::Large, 10.0),
            obs(1, 2, MarketSize::Small, 20.0),
            obs(1, 1, MarketSize::Small, 30.0),
            obs(1, 1, MarketSize::Medium, 40.0),
            obs(2, 2, MarketSize::Large, 50.0),
        ])
    }

    #[test]
    fn test_weekly_means_ordered() {
        let weekly = weekly_means(&sample());
        let keys: Vec<(u32, u32)> = weekly.iter().map(|w| (w.week, w.group)).collect();
        assert_eq!(keys, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
        assert_eq!(weekly[0].mean, 35.0);
        assert_eq!(weekly[3].mean, 50.0);
    }

    #[test]
    fn test_market_means_ordered_by_size() {
        let markets = market_means(&sample());
        let keys: Vec<(MarketSize, u32)> =
            markets.iter().map(|m| (m.market_size, m.group)).collect();
        assert_eq!(
            keys,
            vec![
                (MarketSize::Small, 1),
                (MarketSize::Medium, 1),
                (MarketSize::Large, 2)
            ]
        );
        assert_eq!(markets[0].mean, 25.0);
        assert_eq!(markets[2].mean, 30.0);
    }

    #[test]
    fn test_group_distribution_quartiles() {
        let ds = Dataset::from_observations(
            [5.0, 1.0, 4.0, 2.0, 3.0]
                .iter()
                .map(|&v| obs(1, 1, MarketSize::Small, v))
                .collect(),
        );
        let dist = group_distributions(&ds);
        assert_eq!(dist.len(), 1);
        assert_eq!(dist[0].min, 1.0);
        assert_eq!(dist[0].q1, 2.0);
        assert_eq!(dist[0].median, 3.0);
        assert_eq!(dist[0].q3, 4.0);
        assert_eq!(dist[0].max, 5.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 50.0), 2.5);
        assert_eq!(percentile(&[7.0], 90.0), 7.0);
    }
}
