//! CodeBots Tools
//!
//! Source loading and the command-line runner.

pub mod sources;

use tracing_subscriber::{fmt, EnvFilter};

/// Initialize logging with a default filter.
///
/// Use `RUST_LOG` environment variable to override the default filter.
/// Default is `info`, with `debug` for game lifecycle events.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,codebots_tools=debug,codebots_runtime::runner=debug")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
