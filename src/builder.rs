//! Sandbox database build.
//!
//! Replaces the database file (after confirmation when one already exists)
//! and loads every dataset into it. A dataset that fails to load is reported
//! and skipped; only failures outside the per-dataset work abort the build.

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info};

use crate::dataset::{frame, Dataset, DatasetSource};
use crate::storage::SandboxStore;

/// Dataset written to the database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    pub dataset: Dataset,
    pub rows: usize,
}

/// Dataset that could not be fetched or written
#[derive(Debug, Clone)]
pub struct FailedLoad {
    pub dataset: Dataset,
    pub error: String,
}

/// Per-dataset results of a build
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    pub loaded: Vec<LoadedTable>,
    pub failed: Vec<FailedLoad>,
}

impl BuildReport {
    /// Table names that made it into the database, in build order
    pub fn tables(&self) -> Vec<&'static str> {
        self.loaded.iter().map(|t| t.dataset.name()).collect()
    }
}

/// How a build ended
#[derive(Debug)]
pub enum BuildOutcome {
    /// User kept the existing database; nothing was changed
    Declined,
    Built(BuildReport),
}

/// Ask a yes/no question until the answer is recognisable.
///
/// Accepts y/yes/n/no in any case. End of input counts as "no".
pub async fn confirm<R, W>(input: &mut R, output: &mut W, prompt: &str) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    loop {
        write!(output, "{} (yes/no): ", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            writeln!(output)?;
            return Ok(false);
        }

        match line.trim().to_lowercase().as_str() {
            "yes" | "y" => return Ok(true),
            "no" | "n" => return Ok(false),
            _ => writeln!(output, "Please answer 'yes' or 'no'")?,
        }
    }
}

/// Builds the sandbox database from a dataset source
pub struct SandboxBuilder<S> {
    db_path: PathBuf,
    source: S,
}

impl<S: DatasetSource> SandboxBuilder<S> {
    pub fn new(db_path: impl Into<PathBuf>, source: S) -> Self {
        Self {
            db_path: db_path.into(),
            source,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Recreate the database and load every dataset into it.
    ///
    /// Prompts through `input`/`output` before deleting an existing file.
    /// Errors returned from here are critical: the caller decides whether to
    /// remove the partially written file.
    pub async fn create_database<R, W>(&self, input: &mut R, output: &mut W) -> Result<BuildOutcome>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        if self.db_path.exists() {
            let prompt = format!(
                "Database '{}' already exists. Delete and recreate?",
                self.db_path.display()
            );
            if !confirm(input, output, &prompt).await? {
                writeln!(output, "Aborted. Existing database was not modified.")?;
                return Ok(BuildOutcome::Declined);
            }
            std::fs::remove_file(&self.db_path).with_context(|| {
                format!("Failed to delete {}", self.db_path.display())
            })?;
            info!("Removed existing database {}", self.db_path.display());
        }

        let mut store = SandboxStore::open(&self.db_path)?;
        let mut report = BuildReport::default();

        for dataset in Dataset::ALL {
            writeln!(output, "\nLoading {} dataset...", dataset.label())?;
            match self.load_dataset(&mut store, dataset).await {
                Ok(rows) => {
                    writeln!(
                        output,
                        "✅ Successfully loaded {} dataset with {} rows",
                        dataset.label(),
                        rows
                    )?;
                    report.loaded.push(LoadedTable { dataset, rows });
                }
                Err(e) => {
                    debug!("Loading {} failed: {:?}", dataset, e);
                    writeln!(output, "❌ Error loading {} dataset: {:#}", dataset.label(), e)?;
                    report.failed.push(FailedLoad {
                        dataset,
                        error: format!("{:#}", e),
                    });
                }
            }
        }

        store.close()?;
        Ok(BuildOutcome::Built(report))
    }

    async fn load_dataset(&self, store: &mut SandboxStore, dataset: Dataset) -> Result<usize> {
        let df = self.source.fetch(dataset).await?;
        let df = frame::clean(dataset, df)?;
        store.write_table(dataset.name(), &df)
    }
}

/// Delete a partially built database, if there is one
pub fn remove_partial_database(db_path: &Path) -> Result<()> {
    if db_path.exists() {
        std::fs::remove_file(db_path)
            .with_context(|| format!("Failed to delete {}", db_path.display()))?;
    }
    Ok(())
}
