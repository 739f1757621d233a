//! Example datasets and where they come from.
//!
//! The three practice tables are published as CSV files alongside a popular
//! plotting library. `HttpSource` downloads (and caches) them; anything else
//! implementing `DatasetSource` can stand in for it.

pub mod cache;
pub mod frame;
pub mod http;

pub use cache::DatasetCache;
pub use http::HttpSource;

use async_trait::async_trait;
use polars::prelude::DataFrame;
use std::fmt;

/// Base URL of the example dataset repository
pub const BASE_URL: &str = "https://raw.githubusercontent.com/mwaskom/seaborn-data/master";

/// Build the download URL for a dataset
pub fn dataset_url(base_url: &str, name: &str) -> String {
    format!("{}/{}.csv", base_url.trim_end_matches('/'), name)
}

/// One of the fixed sandbox datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    Mpg,
    Tips,
    Penguins,
}

impl Dataset {
    /// Build order
    pub const ALL: [Dataset; 3] = [Dataset::Mpg, Dataset::Tips, Dataset::Penguins];

    /// Remote file stem and table name
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Mpg => "mpg",
            Dataset::Tips => "tips",
            Dataset::Penguins => "penguins",
        }
    }

    /// Label used in progress messages
    pub fn label(&self) -> &'static str {
        match self {
            Dataset::Mpg => "MPG",
            Dataset::Tips => "tips",
            Dataset::Penguins => "penguins",
        }
    }

    /// Whether rows with any missing value are discarded before writing
    pub fn drops_missing(&self) -> bool {
        matches!(self, Dataset::Penguins)
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Provider of tabular datasets by name
#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch(&self, dataset: Dataset) -> anyhow::Result<DataFrame>;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_url() {
        assert_eq!(
            dataset_url(BASE_URL, "tips"),
            "https://raw.githubusercontent.com/mwaskom/seaborn-data/master/tips.csv"
        );
        assert_eq!(
            dataset_url("http://localhost:8000/", "mpg"),
            "http://localhost:8000/mpg.csv"
        );
    }

    #[test]
    fn test_build_order_and_names() {
        let names: Vec<_> = Dataset::ALL.iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["mpg", "tips", "penguins"]);
        assert_eq!(Dataset::Mpg.label(), "MPG");
    }

    #[test]
    fn test_only_penguins_drop_missing() {
        assert!(Dataset::Penguins.drops_missing());
        assert!(!Dataset::Mpg.drops_missing());
        assert!(!Dataset::Tips.drops_missing());
    }
}
