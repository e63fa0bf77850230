//! Span definitions per checker: alignment, quotes, refinement, review.
//!
//! Each span carries the identifying metadata of the operation via the
//! `tracing` crate.

/// Create an alignment span.
#[macro_export]
macro_rules! alignment_span {
    ($source_tokens:expr, $transformed_tokens:expr) => {
        tracing::info_span!(
            $crate::observability::spans::names::ALIGNMENT,
            source_tokens = $source_tokens,
            transformed_tokens = $transformed_tokens
        )
    };
}

/// Create a quote-matching span.
#[macro_export]
macro_rules! quote_span {
    ($quote_count:expr, $threshold:expr) => {
        tracing::info_span!(
            $crate::observability::spans::names::QUOTES,
            quote_count = $quote_count,
            threshold = $threshold
        )
    };
}

/// Create a refinement span.
#[macro_export]
macro_rules! refinement_span {
    ($oracle:expr, $max_iterations:expr) => {
        tracing::info_span!(
            $crate::observability::spans::names::REFINEMENT,
            oracle = %$oracle,
            max_iterations = $max_iterations
        )
    };
}

/// Create a review span covering one document.
#[macro_export]
macro_rules! review_span {
    ($mode:expr) => {
        tracing::info_span!($crate::observability::spans::names::REVIEW, mode = %$mode)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const ALIGNMENT: &str = "fidelity.alignment";
    pub const QUOTES: &str = "fidelity.quotes";
    pub const REFINEMENT: &str = "fidelity.refinement";
    pub const REVIEW: &str = "fidelity.review";
}
