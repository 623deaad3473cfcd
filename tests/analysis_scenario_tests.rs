// End-to-end scenarios over the library API: parse, summarize, test, recommend

use abdash::{anova, derive_insight, summarize, tukey_hsd, AnalysisError, Dataset};

const HEADER: &str = "Promotion,SalesInThousands,MarketSize,LocationID,week\n";

fn parse(rows: &[(u32, f64)]) -> Dataset {
    let mut csv = String::from(HEADER);
    for (i, (promotion, sales)) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},{},Medium,{},{}\n",
            promotion,
            sales,
            i + 1,
            i % 4 + 1
        ));
    }
    Dataset::from_reader(csv.as_bytes()).unwrap()
}

#[test]
fn test_four_location_example() {
    let ds = parse(&[(1, 50.0), (2, 45.0), (1, 55.0), (2, 40.0)]);

    let summaries = summarize(&ds);
    assert_eq!(summaries.len(), 2);
    assert_eq!(summaries[0].group, 1);
    assert_eq!(summaries[0].count, 2);
    assert_eq!(summaries[0].mean, 52.5);
    assert_eq!(summaries[0].std_dev, Some(3.54));
    assert_eq!(summaries[0].total, 105.0);
    assert_eq!(summaries[1].mean, 42.5);

    let insight = derive_insight(&summaries).unwrap();
    assert_eq!(insight.best_group, 1);
    assert_eq!(insight.worst_group, 2);
    assert_eq!(insight.revenue_lift, 10.0);

    // SSB = 100, SSW = 25, F = 100 / 12.5
    let result = anova(&ds).unwrap();
    assert!((result.f_statistic - 8.0).abs() < 1e-9);
    assert!(!result.significant);
}

#[test]
fn test_zero_within_variance() {
    let ds = parse(&[(1, 10.0), (1, 10.0), (2, 20.0), (2, 20.0), (3, 10.0), (3, 10.0)]);

    let insight = derive_insight(&summarize(&ds)).unwrap();
    assert_eq!(insight.best_group, 2);
    assert_eq!(insight.worst_group, 1);
    assert_eq!(insight.revenue_lift, 10.0);

    assert!(matches!(
        anova(&ds),
        Err(AnalysisError::InsufficientData { .. })
    ));
    assert!(matches!(
        tukey_hsd(&ds, 0.05),
        Err(AnalysisError::InsufficientData { .. })
    ));
}

#[test]
fn test_clearly_separated_campaigns() {
    let mut rows = Vec::new();
    for (group, center) in [(1, 50.0), (2, 55.0), (3, 60.0)] {
        for i in 0..30 {
            let offset = if i % 2 == 0 { -1.0 } else { 1.0 };
            rows.push((group, center + offset));
        }
    }
    let ds = parse(&rows);

    let result = anova(&ds).unwrap();
    assert!(result.significant);
    assert!(result.p_value < 0.05);

    let tukey = tukey_hsd(&ds, 0.05).unwrap();
    assert!(tukey.pair(1, 2).unwrap().reject);
    assert!(tukey.pair(1, 3).unwrap().reject);
    assert!(tukey.pair(2, 3).unwrap().reject);
    assert!((tukey.pair(1, 3).unwrap().mean_diff - 10.0).abs() < 1e-9);
}

#[test]
fn test_small_spread_at_large_magnitude() {
    let mut rows = Vec::new();
    for (group, center) in [(1, 1.0e6), (2, 1.0e6 + 1.0)] {
        for i in 0..20 {
            let offset = if i % 2 == 0 { -0.01 } else { 0.01 };
            rows.push((group, center + offset));
        }
    }
    let ds = parse(&rows);

    let result = anova(&ds).unwrap();
    assert!(result.significant);
    assert!(result.f_statistic > 1.0e3);

    let tukey = tukey_hsd(&ds, 0.05).unwrap();
    let pair = tukey.pair(1, 2).unwrap();
    assert!(pair.reject);
    assert!((pair.mean_diff - 1.0).abs() < 1e-6);
}

#[test]
fn test_singleton_group() {
    let ds = parse(&[(1, 10.0), (1, 12.0), (2, 30.0)]);

    let summaries = summarize(&ds);
    assert_eq!(summaries[1].count, 1);
    assert_eq!(summaries[1].std_dev, None);

    assert!(matches!(
        anova(&ds),
        Err(AnalysisError::InsufficientData { .. })
    ));
    assert!(matches!(
        tukey_hsd(&ds, 0.05),
        Err(AnalysisError::InsufficientData { .. })
    ));
}

#[test]
fn test_single_group_has_no_insight() {
    let ds = parse(&[(1, 10.0), (1, 12.0)]);
    assert!(matches!(
        derive_insight(&summarize(&ds)),
        Err(AnalysisError::InsufficientData { .. })
    ));
}

#[test]
fn test_empty_table() {
    let ds = Dataset::from_reader(HEADER.as_bytes()).unwrap();
    assert!(ds.is_empty());
    assert!(summarize(&ds).is_empty());
    assert!(anova(&ds).is_err());
}

#[test]
fn test_non_numeric_sales_rejected() {
    let csv = format!("{}1,abc,Small,1,1\n", HEADER);
    assert!(matches!(
        Dataset::from_reader(csv.as_bytes()),
        Err(AnalysisError::Parse { .. })
    ));
}

#[test]
fn test_unknown_market_size_rejected() {
    let csv = format!("{}1,10.0,Huge,1,1\n", HEADER);
    assert!(matches!(
        Dataset::from_reader(csv.as_bytes()),
        Err(AnalysisError::Parse { .. })
    ));
}

#[test]
fn test_columns_in_any_order() {
    let csv = "week,LocationID,MarketSize,SalesInThousands,Promotion\n1,7,Large,33.5,2\n";
    let ds = Dataset::from_reader(csv.as_bytes()).unwrap();
    let obs = &ds.observations()[0];
    assert_eq!(obs.promotion, 2);
    assert_eq!(obs.sales, 33.5);
    assert_eq!(obs.location_id, 7);
}

#[test]
fn test_fixture_file() {
    let ds = abdash::load_dataset("tests/fixtures/ab_data_small.csv").unwrap();
    assert_eq!(ds.len(), 48);
    assert_eq!(ds.group_ids(), vec![1, 2, 3]);
    assert!(ds.iter().all(|o| o.market_id.is_some() && o.age_of_store.is_some()));
}
