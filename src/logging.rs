//! Diagnostic logging setup.
//!
//! All diagnostics go to **stderr** through `tracing`, so stdout stays
//! parseable for scripts (`rscs agencies --json | jq`). The level comes from
//! `RUST_LOG` and defaults to `warn`.

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Output format for diagnostic events (`[logging].format`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line events.
    Pretty,
    /// One JSON object per line.
    Json,
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    // A subscriber already being installed (e.g. in tests) is fine.
    let _ = result;
}
