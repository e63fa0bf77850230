//! # fidelity-validation
//!
//! The content-fidelity checkers.
//!
//! ## Checkers
//! 1. **Alignment**: tolerant word-preservation alignment of a reformatted
//!    document against its source
//! 2. **Quotes**: fuzzy location of claimed excerpts in the source
//! 3. **Refinement**: bounded score-and-revise loop against an external
//!    quality oracle
//!
//! All three compare through [`normalize`]. Each checker is stateless; the
//! [`FidelityEngine`] runs the ones a [`ReviewMode`] selects and turns
//! their results into a [`FidelityReport`].

pub mod alignment;
pub mod engine;
mod evidence;
pub mod normalize;
pub mod quotes;
pub mod refinement;
pub mod report;
pub mod tokenize;

pub use alignment::SequenceAligner;
pub use engine::{FidelityEngine, ReviewContext, ReviewMode};
pub use normalize::normalize;
pub use quotes::{match_quote, QuoteMatcher};
pub use refinement::{refine, QualityRefiner};
pub use report::{AlignmentReport, FidelityReport, Finding, FindingKind, QuoteReport, RefinementReport};
