//! Diagnostic tracing shared by the CLI and the server.
//!
//! Tracing goes to stderr. User-facing output (rendered sets, status lines,
//! share payloads) goes to stdout and is not affected by the filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directives for the CLI at a given `-v` count.
pub fn cli_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "warn,luckydraw=info",
        _ => "warn,luckydraw=debug",
    }
}

/// `RUST_LOG` when it is set and parses, otherwise `fallback`.
pub fn filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the stderr subscriber. Later calls leave the first one in place.
///
/// ```bash
/// RUST_LOG=luckydraw::io=debug luckydraw --remote http://localhost:3000 lotto
/// ```
pub fn init(fallback: &str) {
    let installed = tracing_subscriber::registry()
        .with(filter(fallback))
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
