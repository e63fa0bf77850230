//! Top-level error aggregating every subsystem error via `From`.

use super::{ConfigError, FidelityErrorCode, InputError, OracleError};

/// Errors surfaced by the engine's public operations.
#[derive(Debug, thiserror::Error)]
pub enum FidelityError {
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
}

pub type FidelityResult<T> = Result<T, FidelityError>;

impl FidelityErrorCode for FidelityError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Input(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
            Self::Oracle(e) => e.error_code(),
        }
    }
}
