//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::constants::LOG_ENV_VAR;

static INIT: Once = Once::new();

/// Output format of the subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

/// Initialize the tracing subscriber.
///
/// Reads the `FIDELITY_LOG` environment variable for per-module levels,
/// e.g. `FIDELITY_LOG=fidelity_validation=debug,fidelity_oracle=warn`.
/// Falls back to `info` for the fidelity crates when unset or invalid.
/// Logs go to stderr so reports on stdout stay machine-readable.
///
/// Idempotent: only the first call installs a subscriber.
pub fn init_tracing(format: LogFormat) {
    match std::env::var(LOG_ENV_VAR) {
        Ok(directives) => init_tracing_with_filter(&directives, format),
        Err(_) => install(default_filter(), format),
    }
}

/// Initialize tracing with explicit filter directives, used by embedders
/// that do not read `FIDELITY_LOG`. Invalid directives fall back to the
/// default filter.
pub fn init_tracing_with_filter(directives: &str, format: LogFormat) {
    install(parse_filter(directives), format);
}

fn parse_filter(directives: &str) -> EnvFilter {
    EnvFilter::try_new(directives).unwrap_or_else(|_| default_filter())
}

fn default_filter() -> EnvFilter {
    EnvFilter::new("fidelity_core=info,fidelity_validation=info,fidelity_oracle=info,fidelity=info")
}

fn install(filter: EnvFilter, format: LogFormat) {
    INIT.call_once(|| {
        let registry = tracing_subscriber::registry().with(filter);
        let result = match format {
            LogFormat::Human => registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_thread_ids(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .try_init(),
        };
        // Another subscriber was installed by the host; keep theirs.
        let _ = result;
    });
}
