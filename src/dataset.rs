//! Data loader for the campaign experiment table
//!
//! Reads a comma-delimited file with the fixed column contract
//! (`Promotion`, `SalesInThousands`, `MarketSize`, `LocationID`, `week`)
//! into an immutable [`Dataset`]. `MarketID` and `AgeOfStore` are picked up
//! when present; any other column is carried through inspection only.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Columns every input file must carry, with their exact header names
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Promotion",
    "SalesInThousands",
    "MarketSize",
    "LocationID",
    "week",
];

/// Default location of the experiment table
pub const DEFAULT_DATA_PATH: &str = "data/AB_data.csv";

/// Market size covariate (fixed per location)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MarketSize {
    Small,
    Medium,
    Large,
}

impl MarketSize {
    /// All market sizes in display order
    pub const ALL: [MarketSize; 3] = [MarketSize::Small, MarketSize::Medium, MarketSize::Large];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketSize::Small => "Small",
            MarketSize::Medium => "Medium",
            MarketSize::Large => "Large",
        }
    }
}

impl fmt::Display for MarketSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One row of the experiment: a location's sales for one week under one promotion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    /// Treatment group (promotion code, >= 1)
    pub promotion: u32,
    /// Weekly sales in thousands (non-negative)
    pub sales: f64,
    pub market_size: MarketSize,
    pub location_id: u32,
    /// Week number, starting at 1
    pub week: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_id: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_of_store: Option<u32>,
}

/// Row as it appears on disk, before value checks
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "Promotion")]
    promotion: u32,
    #[serde(rename = "SalesInThousands")]
    sales: f64,
    #[serde(rename = "MarketSize")]
    market_size: MarketSize,
    #[serde(rename = "LocationID")]
    location_id: u32,
    #[serde(rename = "week")]
    week: u32,
    #[serde(rename = "MarketID", default)]
    market_id: Option<u32>,
    #[serde(rename = "AgeOfStore", default)]
    age_of_store: Option<u32>,
}

impl RawRecord {
    fn into_observation(self, line: u64) -> Result<Observation> {
        let invalid = |message: String| AnalysisError::Parse { line, message };

        if self.promotion == 0 {
            return Err(invalid("Promotion must be a positive integer".to_string()));
        }
        if !self.sales.is_finite() || self.sales < 0.0 {
            return Err(invalid(format!(
                "SalesInThousands must be a finite non-negative number, got {}",
                self.sales
            )));
        }
        if self.week == 0 {
            return Err(invalid("week must start at 1".to_string()));
        }

        Ok(Observation {
            promotion: self.promotion,
            sales: self.sales,
            market_size: self.market_size,
            location_id: self.location_id,
            week: self.week,
            market_id: self.market_id,
            age_of_store: self.age_of_store,
        })
    }
}

/// Missing-value count for a single column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Structural overview of a loaded dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub column_names: Vec<String>,
    pub missing_values: Vec<ColumnMissing>,
    /// Observation count per promotion, ascending by promotion
    pub group_counts: BTreeMap<u32, usize>,
}

/// Immutable, ordered collection of observations
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
    columns: Vec<String>,
    missing: Vec<usize>,
}

impl Dataset {
    /// Build a dataset directly from observations (columns = the required set)
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let missing = vec![0; columns.len()];
        Self {
            observations,
            columns,
            missing,
        }
    }

    /// Parse a dataset from any reader producing comma-delimited text with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::Fields)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_error)?.clone();
        let columns: Vec<String> = headers.iter().map(str::to_string).collect();
        check_schema(&columns)?;

        let mut missing = vec![0usize; columns.len()];
        let mut observations = Vec::new();

        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            for (idx, field) in record.iter().enumerate() {
                if field.is_empty() {
                    missing[idx] += 1;
                }
            }

            let raw: RawRecord =
                record
                    .deserialize(Some(&headers))
                    .map_err(|e| AnalysisError::Parse {
                        line,
                        message: e.to_string(),
                    })?;
            observations.push(raw.into_observation(line)?);
        }

        let blanks: usize = missing.iter().sum();
        if blanks > 0 {
            tracing::warn!(blanks, "experiment table has blank fields");
        }
        tracing::debug!(
            rows = observations.len(),
            columns = columns.len(),
            "parsed experiment table"
        );

        Ok(Self {
            observations,
            columns,
            missing,
        })
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Observation> {
        self.observations.iter()
    }

    /// Header names in file order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Distinct promotion codes, ascending
    pub fn group_ids(&self) -> Vec<u32> {
        self.sales_by_group().into_keys().collect()
    }

    /// Outcome values partitioned by promotion, in file order
    pub fn sales_by_group(&self) -> BTreeMap<u32, Vec<f64>> {
        let mut groups: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for obs in &self.observations {
            groups.entry(obs.promotion).or_default().push(obs.sales);
        }
        groups
    }

    /// Shape, columns, missing values and group counts
    pub fn inspect(&self) -> DatasetOverview {
        let mut group_counts = BTreeMap::new();
        for obs in &self.observations {
            *group_counts.entry(obs.promotion).or_insert(0) += 1;
        }

        DatasetOverview {
            rows: self.observations.len(),
            columns: self.columns.len(),
            column_names: self.columns.clone(),
            missing_values: self
                .columns
                .iter()
                .zip(&self.missing)
                .map(|(column, &missing)| ColumnMissing {
                    column: column.clone(),
                    missing,
                })
                .collect(),
            group_counts,
        }
    }
}

fn check_schema(columns: &[String]) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|required| !columns.iter().any(|c| c == *required))
        .map(|c| c.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AnalysisError::Schema {
            missing,
            found: columns.to_vec(),
        })
    }
}

fn csv_error(err: csv::Error) -> AnalysisError {
    let line = err.position().map(|p| p.line()).unwrap_or_default();
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(io) => AnalysisError::Io(io),
        _ => AnalysisError::Parse { line, message },
    }
}

/// Load the experiment table from `path`
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AnalysisError::NotFound {
            path: path.to_path_buf(),
        },
        _ => AnalysisError::Io(e),
    })?;

    let dataset = Dataset::from_reader(BufReader::new(file))?;
    tracing::info!(path = %path.display(), rows = dataset.len(), "loaded dataset");
    Ok(dataset)
}

static DATASET_CACHE: OnceLock<Mutex<HashMap<PathBuf, Arc<Dataset>>>> = OnceLock::new();

/// Load `path` once per process and hand out shared copies afterwards
///
/// Entries live until the process exits. Failed loads are not cached.
pub fn load_cached<P: AsRef<Path>>(path: P) -> Result<Arc<Dataset>> {
    let cache = DATASET_CACHE.get_or_init(Default::default);
    let key = path.as_ref().to_path_buf();

    if let Some(hit) = cache
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&key)
    {
        tracing::debug!(path = %key.display(), "dataset cache hit");
        return Ok(Arc::clone(hit));
    }

    let dataset = Arc::new(load_dataset(&key)?);
    cache
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, Arc::clone(&dataset));
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
MarketID,MarketSize,LocationID,AgeOfStore,Promotion,week,SalesInThousands
1,Medium,1,4,3,1,33.73
1,Medium,1,4,3,2,35.67
1,Medium,2,5,2,1,27.81
10,Large,919,2,1,4,64.34
";

    #[test]
    fn test_parse_sample() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.len(), 4);
        let first = &ds.observations()[0];
        assert_eq!(first.promotion, 3);
        assert_eq!(first.market_size, MarketSize::Medium);
        assert_eq!(first.location_id, 1);
        assert_eq!(first.week, 1);
        assert_eq!(first.market_id, Some(1));
        assert_eq!(first.age_of_store, Some(4));
        assert!((first.sales - 33.73).abs() < 1e-12);
    }

    #[test]
    fn test_optional_columns_absent() {
        let input = "Promotion,SalesInThousands,MarketSize,LocationID,week\n1,10.5,Small,3,2\n";
        let ds = Dataset::from_reader(input.as_bytes()).unwrap();
        assert_eq!(ds.observations()[0].market_id, None);
        assert_eq!(ds.observations()[0].age_of_store, None);
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let input = "Promotion,Sales,MarketSize,LocationID,week\n1,10.5,Small,3,2\n";
        match Dataset::from_reader(input.as_bytes()) {
            Err(AnalysisError::Schema { missing, .. }) => {
                assert_eq!(missing, vec!["SalesInThousands".to_string()]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let input = "promotion,SalesInThousands,MarketSize,LocationID,Week\n1,10.5,Small,3,2\n";
        match Dataset::from_reader(input.as_bytes()) {
            Err(AnalysisError::Schema { missing, .. }) => {
                assert!(missing.contains(&"Promotion".to_string()));
                assert!(missing.contains(&"week".to_string()));
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_number_reports_line() {
        let input = "Promotion,SalesInThousands,MarketSize,LocationID,week\n\
                     1,10.5,Small,3,1\n\
                     2,abc,Small,3,2\n";
        match Dataset::from_reader(input.as_bytes()) {
            Err(AnalysisError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_market_size_is_parse_error() {
        let input = "Promotion,SalesInThousands,MarketSize,LocationID,week\n1,10.5,Huge,3,1\n";
        assert!(matches!(
            Dataset::from_reader(input.as_bytes()),
            Err(AnalysisError::Parse { .. })
        ));
    }

    #[test]
    fn test_negative_sales_rejected() {
        let input = "Promotion,SalesInThousands,MarketSize,LocationID,week\n1,-2.0,Small,3,1\n";
        assert!(matches!(
            Dataset::from_reader(input.as_bytes()),
            Err(AnalysisError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_zero_promotion_rejected() {
        let input = "Promotion,SalesInThousands,MarketSize,LocationID,week\n0,2.0,Small,3,1\n";
        assert!(matches!(
            Dataset::from_reader(input.as_bytes()),
            Err(AnalysisError::Parse { .. })
        ));
    }

    #[test]
    fn test_ragged_row_is_parse_error() {
        let input = "Promotion,SalesInThousands,MarketSize,LocationID,week\n1,2.0,Small\n";
        assert!(matches!(
            Dataset::from_reader(input.as_bytes()),
            Err(AnalysisError::Parse { .. })
        ));
    }

    #[test]
    fn test_group_ids_sorted_and_distinct() {
        let ds = Dataset::from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(ds.group_ids(), vec![1, 2, 3]);
        let groups = ds.sales_by_group();
        assert_eq!(groups[&3].len(), 2);
    }

    #[test]
    fn test_inspect_counts_missing_values() {
        let input = "MarketID,MarketSize,LocationID,AgeOfStore,Promotion,week,SalesInThousands\n\
                     ,Small,1,,1,1,10.0\n\
                     2,Large,2,7,2,1,12.0\n";
        let overview = Dataset::from_reader(input.as_bytes()).unwrap().inspect();
        assert_eq!(overview.rows, 2);
        assert_eq!(overview.columns, 7);
        let missing: HashMap<_, _> = overview
            .missing_values
            .iter()
            .map(|m| (m.column.as_str(), m.missing))
            .collect();
        assert_eq!(missing["MarketID"], 1);
        assert_eq!(missing["AgeOfStore"], 1);
        assert_eq!(missing["Promotion"], 0);
        assert_eq!(overview.group_counts[&1], 1);
        assert_eq!(overview.group_counts[&2], 1);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let result = load_dataset("/definitely/not/here/AB_data.csv");
        assert!(matches!(result, Err(AnalysisError::NotFound { .. })));
    }

    #[test]
    fn test_load_cached_returns_shared_dataset() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let first = load_cached(file.path()).unwrap();
        let second = load_cached(file.path()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 4);
    }
}
