//! The external scoring/transformation capability.

use crate::errors::OracleError;
use crate::models::{DimensionScore, Rubric};

/// Result of a single oracle round trip.
///
/// The refiner drives its retry loop by matching on this value:
/// transient failures are retried with backoff, permanent ones end the
/// session as inconclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleOutcome<T> {
    Success(T),
    TransientFailure(String),
    PermanentFailure(String),
}

impl<T> OracleOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OracleOutcome<U> {
        match self {
            Self::Success(v) => OracleOutcome::Success(f(v)),
            Self::TransientFailure(r) => OracleOutcome::TransientFailure(r),
            Self::PermanentFailure(r) => OracleOutcome::PermanentFailure(r),
        }
    }
}

impl<T> From<Result<T, OracleError>> for OracleOutcome<T> {
    fn from(result: Result<T, OracleError>) -> Self {
        match result {
            Ok(v) => Self::Success(v),
            Err(OracleError::Transient { reason }) => Self::TransientFailure(reason),
            Err(e) => Self::PermanentFailure(e.to_string()),
        }
    }
}

/// Black-box, potentially slow, potentially failing text oracle.
///
/// Any text-generation backend can satisfy this; the engine never looks
/// behind it and does not require determinism.
pub trait IQualityOracle: Send + Sync {
    /// Score `document` against every dimension of `rubric`, in rubric order.
    fn score(&self, document: &str, rubric: &Rubric) -> OracleOutcome<Vec<DimensionScore>>;

    /// Produce a revised document following `instruction`.
    fn transform(&self, document: &str, instruction: &str) -> OracleOutcome<String>;

    /// Human-readable backend name, used in logs and reports.
    fn name(&self) -> &str;
}
