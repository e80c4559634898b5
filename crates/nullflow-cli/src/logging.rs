//! `tracing_subscriber` initialization for the CLI binary.

use tracing_subscriber::EnvFilter;

/// Install a `fmt` subscriber writing to stderr so `--format json` output on
/// stdout stays machine-readable. `-q`/`--quiet` raises the floor to `warn`
/// regardless of `--log-level`.
pub fn init(log_level: &str, quiet: bool) {
    let directive = if quiet { "warn" } else { log_level };
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
