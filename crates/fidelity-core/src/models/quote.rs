use serde::{Deserialize, Serialize};

/// A claimed excerpt of the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    /// Optional label from the producer (e.g. "key_claim", "statistic").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Quote {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Best-matching source span for a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpan {
    /// First source token of the window.
    pub start_token: usize,
    /// One past the last source token of the window.
    pub end_token: usize,
    /// Byte range of the window in the source text.
    pub start_offset: usize,
    pub end_offset: usize,
    pub text: String,
}

/// Classification of a quote's best match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Exact,
    FuzzyMatch,
    Mismatch,
}

impl MatchStatus {
    pub fn is_grounded(&self) -> bool {
        !matches!(self, Self::Mismatch)
    }
}

/// Outcome of matching one quote against the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub quote: Quote,
    /// `None` when the source had no tokens to match against.
    pub span: Option<SourceSpan>,
    /// Similarity in [0, 1].
    pub ratio: f64,
    pub status: MatchStatus,
}
