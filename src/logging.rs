//! Tracing initialization
//!
//! Logs go to stderr so stdout stays clean for results, which is what
//! makes the CLI pipe-friendly. `RUST_LOG` overrides the built-in filter.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str =
    "council=debug,council_core=debug,council_llm=debug,council_config=debug,info";

/// Initialize the tracing subscriber. Safe to call once per process;
/// later calls are ignored.
pub fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
