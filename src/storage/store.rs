//! SQLite sink for dataset tables

use anyhow::{Context, Result};
use polars::prelude::{AnyValue, Column, DataFrame};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};
use std::path::Path;

use super::schema::{create_table_sql, drop_table_sql, insert_sql, quote_ident};

/// Connection to the sandbox database
pub struct SandboxStore {
    conn: Connection,
}

impl SandboxStore {
    /// Open (creating if needed) the database file at `db_path`
    pub fn open(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open database {}", db_path.display()))?;

        // Touch the file so an unusable path fails here rather than mid-build
        conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))
            .with_context(|| format!("Failed to read database {}", db_path.display()))?;

        Ok(Self { conn })
    }

    /// Create an in-memory store (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Write `frame` as `table`, replacing any existing table of that name.
    ///
    /// Runs in one transaction; on error the previous table is left as it was.
    /// Returns the number of rows written.
    pub fn write_table(&mut self, table: &str, frame: &DataFrame) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute(&drop_table_sql(table), [])?;
        tx.execute(&create_table_sql(table, frame), [])
            .with_context(|| format!("Failed to create table {}", table))?;

        {
            let mut stmt = tx.prepare(&insert_sql(table, frame))?;
            let columns = frame.get_columns();
            for row in 0..frame.height() {
                let values = columns
                    .iter()
                    .map(|column| sql_value(column, row))
                    .collect::<Result<Vec<_>>>()?;
                stmt.execute(params_from_iter(values.iter()))
                    .with_context(|| format!("Failed to insert row {} into {}", row, table))?;
            }
        }

        tx.commit()?;
        Ok(frame.height())
    }

    /// Names of all user tables, sorted
    pub fn table_names(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Number of rows in a table
    pub fn row_count(&self, table: &str) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", quote_ident(table)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Close the connection, surfacing any error SQLite reports
    pub fn close(self) -> Result<()> {
        self.conn
            .close()
            .map_err(|(_, e)| e)
            .context("Failed to close database")
    }
}

/// Convert one frame cell to a SQLite value
fn sql_value(column: &Column, row: usize) -> Result<Value> {
    let value = match column.get(row)? {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Integer(v as i64),
        AnyValue::Int32(v) => Value::Integer(v as i64),
        AnyValue::Int64(v) => Value::Integer(v),
        AnyValue::UInt32(v) => Value::Integer(v as i64),
        AnyValue::UInt64(v) => match i64::try_from(v) {
            Ok(v) => Value::Integer(v),
            Err(_) => Value::Text(v.to_string()),
        },
        AnyValue::Float32(v) => Value::Real(v as f64),
        AnyValue::Float64(v) => Value::Real(v),
        AnyValue::String(v) => Value::Text(v.to_string()),
        AnyValue::StringOwned(v) => Value::Text(v.to_string()),
        other => Value::Text(other.to_string()),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::MPG_CSV;
    use crate::dataset::frame::read_csv;
    use polars::prelude::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_table() {
        let mut store = SandboxStore::in_memory().unwrap();
        let frame = read_csv(MPG_CSV.as_bytes().to_vec()).unwrap();

        assert_eq!(store.write_table("mpg", &frame).unwrap(), 3);
        assert_eq!(store.table_names().unwrap(), vec!["mpg"]);
        assert_eq!(store.row_count("mpg").unwrap(), 3);

        let (name, cylinders, horsepower): (String, i64, Option<f64>) = store
            .conn
            .query_row(
                "SELECT name, cylinders, horsepower FROM mpg WHERE name = 'ford pinto'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!(name, "ford pinto");
        assert_eq!(cylinders, 4);
        assert_eq!(horsepower, None);
    }

    #[test]
    fn test_write_table_replaces_existing() {
        let mut store = SandboxStore::in_memory().unwrap();
        let first = df!("day" => ["Sun", "Sat", "Thur"]).unwrap();
        let second = df!("tip" => [1.01]).unwrap();

        store.write_table("tips", &first).unwrap();
        store.write_table("tips", &second).unwrap();

        assert_eq!(store.row_count("tips").unwrap(), 1);
        let column_type: String = store
            .conn
            .query_row(
                "SELECT type FROM pragma_table_info('tips') WHERE name = 'tip'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(column_type, "REAL");
    }

    #[test]
    fn test_booleans_stored_as_integers() {
        let mut store = SandboxStore::in_memory().unwrap();
        let frame = df!("smoker" => [true, false]).unwrap();
        store.write_table("flags", &frame).unwrap();

        let total: i64 = store
            .conn
            .query_row("SELECT SUM(smoker) FROM flags", [], |row| row.get(0))
            .unwrap();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_unsigned_values_beyond_i64_kept_exact() {
        let mut store = SandboxStore::in_memory().unwrap();
        let frame = df!("id" => [7u64, u64::MAX]).unwrap();
        store.write_table("ids", &frame).unwrap();

        let values: Vec<String> = store
            .conn
            .prepare("SELECT CAST(id AS TEXT) FROM ids ORDER BY rowid")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<_>>()
            .unwrap();
        assert_eq!(values, vec!["7".to_string(), u64::MAX.to_string()]);
    }

    #[test]
    fn test_open_creates_file_and_close() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sandbox.db");

        let store = SandboxStore::open(&path).unwrap();
        assert!(path.exists());
        store.close().unwrap();
    }

    #[test]
    fn test_open_fails_without_parent_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("sandbox.db");
        assert!(SandboxStore::open(&path).is_err());
        assert!(!path.exists());
    }
}
