/// Oracle call failures, as seen by concrete oracle adapters.
///
/// The refiner never sees these directly: adapters fold them into an
/// [`crate::traits::OracleOutcome`] so the retry loop can match on them.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OracleError {
    #[error("transient oracle failure: {reason}")]
    Transient { reason: String },

    #[error("permanent oracle failure: {reason}")]
    Permanent { reason: String },

    #[error("no oracle configured: {reason}")]
    Unavailable { reason: String },
}

impl OracleError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}

impl super::FidelityErrorCode for OracleError {
    fn error_code(&self) -> &'static str {
        use super::error_code;
        match self {
            Self::Transient { .. } => error_code::ORACLE_TRANSIENT,
            Self::Permanent { .. } => error_code::ORACLE_PERMANENT,
            Self::Unavailable { .. } => error_code::ORACLE_UNAVAILABLE,
        }
    }
}
