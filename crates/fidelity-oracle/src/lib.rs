//! # fidelity-oracle
//!
//! Adapters that satisfy [`fidelity_core::IQualityOracle`] over a network.
//! The HTTP transport is behind the `http` feature (on by default).
//!
//! Adapters make exactly one attempt per call and report the failure
//! class through [`fidelity_core::OracleOutcome`]; retry and backoff belong
//! to the refiner.

pub mod http;
pub mod protocol;

pub use http::{classify_status, HttpOracle, HttpOracleConfig};
