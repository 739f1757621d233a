//! SQL Sandbox
//!
//! Builds a local SQLite database holding the `mpg`, `tips` and `penguins`
//! example datasets for practising SQL queries.

pub mod builder;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod reset;
pub mod retry;
pub mod storage;

pub use builder::{BuildOutcome, BuildReport, SandboxBuilder};
pub use config::AppConfig;
pub use dataset::{Dataset, DatasetSource, HttpSource};
pub use reset::ResetOutcome;
