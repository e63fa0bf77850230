//! Fixed constants of the matching and scoring algorithms.
//!
//! Tunable values live in [`crate::config::defaults`]; these are not
//! configurable.

/// Ratio at or above which a quote match is classified as exact.
pub const EXACT_MATCH_RATIO: f64 = 0.98;

/// Shortest quote window, as a fraction of the quote's token count.
pub const WINDOW_MIN_FACTOR: f64 = 0.8;

/// Longest quote window, as a fraction of the quote's token count.
pub const WINDOW_MAX_FACTOR: f64 = 1.25;

/// Emphasis markers stripped from both ends of a token.
pub const EMPHASIS_MARKERS: &[char] = &['*', '_', '~', '`'];

/// Environment variable read by the tracing setup.
pub const LOG_ENV_VAR: &str = "FIDELITY_LOG";

/// Default project config file name.
pub const PROJECT_CONFIG_FILE: &str = "fidelity.toml";
