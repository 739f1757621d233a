//! SQL generation for dataset tables.
//!
//! Tables mirror the data frame they are written from: one column per frame
//! column, in order, with an affinity picked from the inferred dtype.

use polars::prelude::{DataFrame, DataType};

/// Quote an identifier for SQLite
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQLite column type for a frame dtype
pub fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Boolean
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt32
        | DataType::UInt64 => "INTEGER",
        DataType::Float32 | DataType::Float64 => "REAL",
        _ => "TEXT",
    }
}

/// `CREATE TABLE` statement for a frame
pub fn create_table_sql(table: &str, frame: &DataFrame) -> String {
    let columns: Vec<String> = frame
        .get_columns()
        .iter()
        .map(|c| format!("{} {}", quote_ident(c.name().as_str()), sql_type(c.dtype())))
        .collect();
    format!("CREATE TABLE {} ({})", quote_ident(table), columns.join(", "))
}

/// Parameterised `INSERT` statement for a frame
pub fn insert_sql(table: &str, frame: &DataFrame) -> String {
    let names: Vec<String> = frame
        .get_columns()
        .iter()
        .map(|c| quote_ident(c.name().as_str()))
        .collect();
    let placeholders: Vec<String> = (1..=names.len()).map(|i| format!("?{}", i)).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        placeholders.join(", ")
    )
}

/// `DROP TABLE IF EXISTS` statement
pub fn drop_table_sql(table: &str) -> String {
    format!("DROP TABLE IF EXISTS {}", quote_ident(table))
}
