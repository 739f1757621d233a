//! Command-line entry points for `build-sandbox` and `reset-sandbox`.
//!
//! Both tools print their progress to stdout and map outcomes to exit codes:
//! 0 for success, a declined prompt or a cancelled reset; 1 for a missing
//! database (reset) or a critical failure.

use anyhow::Result;
use clap::{Args, Parser};
use std::future::Future;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::{info, warn};

use crate::builder::{remove_partial_database, BuildOutcome, SandboxBuilder};
use crate::config::AppConfig;
use crate::dataset::{DatasetSource, HttpSource};
use crate::reset::{reset_database, ResetOutcome};

#[derive(Parser)]
#[command(name = "build-sandbox")]
#[command(version, about = "Create the SQL practice database from the example datasets", long_about = None)]
pub struct BuildCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Parser)]
#[command(name = "reset-sandbox")]
#[command(version, about = "Recreate an existing SQL practice database with fresh data", long_about = None)]
pub struct ResetCli {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// Database file to create (default: sandbox.db)
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Always download datasets instead of using the local copies
    #[arg(long)]
    pub no_cache: bool,

    /// Print debug logs to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommonArgs {
    /// Override loaded configuration with command-line flags
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(path) = &self.database {
            config.database.path = path.clone();
        }
        if self.no_cache {
            config.cache.enabled = false;
        }
    }
}

/// Process exit status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
        }
    }
}

/// Build the database; a critical error removes the partial file.
pub async fn build_command<S, R, W>(
    builder: &SandboxBuilder<S>,
    input: &mut R,
    output: &mut W,
) -> Result<ExitStatus>
where
    S: DatasetSource,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(output, "Starting database build process...")?;

    match builder.create_database(input, output).await {
        Ok(BuildOutcome::Declined) => Ok(ExitStatus::Success),
        Ok(BuildOutcome::Built(report)) => {
            info!(
                "Build finished: {} tables loaded, {} failed",
                report.loaded.len(),
                report.failed.len()
            );
            writeln!(output, "\nDatabase build process completed!")?;
            Ok(ExitStatus::Success)
        }
        Err(e) => {
            // Clean up before reporting: the output itself may be what failed
            let cleanup = remove_partial_database(builder.db_path());
            if let Err(write_err) = writeln!(output, "\n❌ Critical Error: {:#}", e) {
                warn!("Could not report critical error ({}): {:#}", write_err, e);
            }
            cleanup?;
            Ok(ExitStatus::Failure)
        }
    }
}

/// Reset an existing database, giving up quietly if `cancel` completes first.
pub async fn reset_command<S, R, W, C>(
    builder: &SandboxBuilder<S>,
    input: &mut R,
    output: &mut W,
    cancel: C,
) -> Result<ExitStatus>
where
    S: DatasetSource,
    R: AsyncBufRead + Unpin,
    W: Write,
    C: Future<Output = ()>,
{
    writeln!(output, "\nSQL Learning Sandbox - Database Reset")?;
    writeln!(output, "====================================")?;

    let result = tokio::select! {
        biased;
        _ = cancel => None,
        result = reset_database(builder, input, output) => Some(result),
    };

    let status = match result {
        None => {
            writeln!(output, "\n\nReset cancelled by user.")?;
            ExitStatus::Success
        }
        Some(Ok(ResetOutcome::MissingDatabase)) => {
            writeln!(
                output,
                "\n❌ No existing database found. Please run build-sandbox first."
            )?;
            ExitStatus::Failure
        }
        Some(Ok(ResetOutcome::Declined)) => ExitStatus::Success,
        Some(Ok(ResetOutcome::Reset(_))) => {
            writeln!(output, "\n✅ Database reset completed successfully!")?;
            ExitStatus::Success
        }
        Some(Err(e)) => {
            writeln!(output, "\n❌ Error resetting database: {:#}", e)?;
            ExitStatus::Failure
        }
    };
    Ok(status)
}

fn load_builder(args: &CommonArgs) -> Result<SandboxBuilder<HttpSource>> {
    let mut config = AppConfig::load()?;
    args.apply(&mut config);
    info!("Database path: {}", config.database.path.display());

    let source = HttpSource::from_config(&config)?;
    Ok(SandboxBuilder::new(config.database.path, source))
}

/// `build-sandbox` against stdin/stdout
pub async fn run_build(args: CommonArgs) -> ExitStatus {
    let builder = match load_builder(&args) {
        Ok(builder) => builder,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            return ExitStatus::Failure;
        }
    };

    let mut input = BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    build_command(&builder, &mut input, &mut output)
        .await
        .unwrap_or_else(|e| {
            eprintln!("❌ {:#}", e);
            ExitStatus::Failure
        })
}

/// `reset-sandbox` against stdin/stdout, cancelled by Ctrl-C
pub async fn run_reset(args: CommonArgs) -> ExitStatus {
    let builder = match load_builder(&args) {
        Ok(builder) => builder,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            return ExitStatus::Failure;
        }
    };

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let mut input = BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    reset_command(&builder, &mut input, &mut output, interrupted)
        .await
        .unwrap_or_else(|e| {
            eprintln!("❌ {:#}", e);
            ExitStatus::Failure
        })
}
