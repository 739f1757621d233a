//! Tracing setup for the command-line tools.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive; `RUST_LOG` takes precedence
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "sql_sandbox=debug"
    } else {
        "sql_sandbox=warn"
    }
}

/// Install a stderr subscriber so log lines stay out of the progress output
pub fn init(verbose: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_directive(verbose).into());

    // Keeps the existing subscriber if one is already installed
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_keeps_first_subscriber() {
        init(false);
        init(true);
        tracing::debug!("still logging");
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "sql_sandbox=warn");
        assert_eq!(default_directive(true), "sql_sandbox=debug");
    }
}
