//! # fidelity-core
//!
//! Foundation crate for the content-fidelity validation engine.
//! Defines the domain types, error taxonomy, typed configuration,
//! oracle capability trait, and tracing setup. Every other crate in the
//! workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod observability;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::FidelityConfig;
pub use errors::{FidelityError, FidelityResult};
pub use models::{InsertionCategory, Verdict};
pub use traits::{CancellationToken, IQualityOracle, OracleOutcome};
