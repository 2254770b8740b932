//! Tracing subscriber setup for programs embedding the finder.

use tracing_subscriber::EnvFilter;

/// Default filter: finder progress at info, noisy HTTP internals at warn.
pub const DEFAULT_DIRECTIVE: &str =
    "source_finder=info,source_search=info,reqwest=warn,hyper=warn,html5ever=warn";

/// Install a stderr fmt subscriber filtered by `RUST_LOG`, falling back to
/// `default_directive`.
///
/// Returns `false` if a global subscriber is already installed.
pub fn init_tracing(default_directive: &str) -> bool {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive)),
        )
        .try_init()
        .is_ok()
}
