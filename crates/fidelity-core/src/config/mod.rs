//! Typed configuration, validated once at construction.

pub mod defaults;
pub mod fidelity_config;

pub use fidelity_config::{
    AlignmentConfig, CliOverrides, FidelityConfig, OracleConfig, ProjectConfig, QuoteConfig,
    RefinementConfig, RetryConfig,
};
