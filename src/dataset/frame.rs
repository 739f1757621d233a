//! CSV parsing and per-dataset cleanup.

use anyhow::{Context, Result};
use polars::prelude::*;
use std::io::Cursor;

use super::Dataset;

/// Parse CSV bytes with a header row into a data frame.
///
/// Column types are inferred; empty fields become nulls.
pub fn read_csv(bytes: Vec<u8>) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()
        .context("Failed to parse CSV")?;
    Ok(df)
}

/// Apply the dataset's cleanup rules before it is written.
pub fn clean(dataset: Dataset, df: DataFrame) -> Result<DataFrame> {
    if dataset.drops_missing() {
        let before = df.height();
        let df = df.drop_nulls::<String>(None)?;
        tracing::debug!(
            "{}: dropped {} rows with missing values",
            dataset,
            before - df.height()
        );
        return Ok(df);
    }
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{MPG_CSV, PENGUINS_CSV};

    #[test]
    fn test_read_csv_infers_types() {
        let df = read_csv(MPG_CSV.as_bytes().to_vec()).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 9);
        assert_eq!(df.column("cylinders").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("mpg").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("horsepower").unwrap().null_count(), 1);
    }

    #[test]
    fn test_penguins_drop_incomplete_rows() {
        let df = read_csv(PENGUINS_CSV.as_bytes().to_vec()).unwrap();
        assert_eq!(df.height(), 5);
        let cleaned = clean(Dataset::Penguins, df).unwrap();
        assert_eq!(cleaned.height(), 3);
    }

    #[test]
    fn test_other_datasets_keep_missing_values() {
        let df = read_csv(MPG_CSV.as_bytes().to_vec()).unwrap();
        let cleaned = clean(Dataset::Mpg, df).unwrap();
        assert_eq!(cleaned.height(), 3);
        assert_eq!(cleaned.column("horsepower").unwrap().null_count(), 1);
    }
}
