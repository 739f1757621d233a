//! Recreates an existing `sandbox.db` with fresh copies of the datasets.

use clap::Parser;
use sql_sandbox::cli::{self, ResetCli};
use sql_sandbox::logging;

#[tokio::main]
async fn main() {
    let cli = ResetCli::parse();
    logging::init(cli.common.verbose);

    // Exit explicitly: a cancelled prompt can leave the stdin reader blocked,
    // which would otherwise hold up runtime shutdown.
    let status = cli::run_reset(cli.common).await;
    std::process::exit(status.code());
}
