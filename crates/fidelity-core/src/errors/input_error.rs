//! Malformed caller input. Fails fast, no partial result.

use super::error_code::{self, FidelityErrorCode};

/// Errors raised when a checker is handed input it cannot work with.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("malformed input: {field} is empty")]
    Empty { field: String },

    #[error("malformed input: {field}: {reason}")]
    MalformedInput { field: String, reason: String },

    #[error("unreadable input {path}: {reason}")]
    Unreadable { path: String, reason: String },

    #[error("score {score} for dimension '{dimension}' outside scale {min}..={max}")]
    ScoreOutOfScale {
        dimension: String,
        score: f64,
        min: f64,
        max: f64,
    },
}

impl InputError {
    pub fn empty(field: impl Into<String>) -> Self {
        Self::Empty {
            field: field.into(),
        }
    }

    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl FidelityErrorCode for InputError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ScoreOutOfScale { .. } => error_code::SCORE_OUT_OF_SCALE,
            _ => error_code::MALFORMED_INPUT,
        }
    }
}
