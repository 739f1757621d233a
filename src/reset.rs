//! Reset of an existing sandbox database.

use anyhow::Result;
use std::io::Write;
use tokio::io::AsyncBufRead;

use crate::builder::{BuildOutcome, BuildReport, SandboxBuilder};
use crate::dataset::DatasetSource;

/// How a reset ended
#[derive(Debug)]
pub enum ResetOutcome {
    /// There was nothing to reset; the filesystem was not touched
    MissingDatabase,
    /// User kept the existing database
    Declined,
    Reset(BuildReport),
}

/// Rebuild the database, but only if one already exists.
pub async fn reset_database<S, R, W>(
    builder: &SandboxBuilder<S>,
    input: &mut R,
    output: &mut W,
) -> Result<ResetOutcome>
where
    S: DatasetSource,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    if !builder.db_path().exists() {
        return Ok(ResetOutcome::MissingDatabase);
    }

    Ok(match builder.create_database(input, output).await? {
        BuildOutcome::Declined => ResetOutcome::Declined,
        BuildOutcome::Built(report) => ResetOutcome::Reset(report),
    })
}
