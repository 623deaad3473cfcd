//! abdash - A/B test analysis dashboard for marketing campaigns
//!
//! Loads a table of weekly store sales tagged with the promotion each store
//! ran, then compares the promotions: per-group summaries, one-way ANOVA,
//! Tukey HSD pairwise comparisons and a best-vs-worst revenue insight.
//! Results render as a text dashboard, JSON, CSV or a standalone HTML page.

pub mod anova;
pub mod breakdown;
pub mod cli;
pub mod config;
pub mod csv_output;
pub mod dataset;
pub mod error;
pub mod html_output;
pub mod insight;
pub mod json_output;
pub mod partition;
pub mod report;
pub mod studentized_range;
pub mod summary;
pub mod tukey;

#[cfg(test)]
mod test_support;

pub use anova::{anova, AnovaResult};
pub use dataset::{load_cached, load_dataset, Dataset, MarketSize, Observation};
pub use error::{AnalysisError, Result};
pub use insight::{derive_insight, BusinessInsight};
pub use report::AnalysisReport;
pub use summary::{summarize, GroupSummary};
pub use tukey::{tukey_hsd, TukeyComparison, TukeyResult};
