//! Creates `sandbox.db` and loads the example datasets into it.

use clap::Parser;
use sql_sandbox::cli::{self, BuildCli};
use sql_sandbox::logging;

#[tokio::main]
async fn main() {
    let cli = BuildCli::parse();
    logging::init(cli.common.verbose);

    let status = cli::run_build(cli.common).await;
    std::process::exit(status.code());
}
