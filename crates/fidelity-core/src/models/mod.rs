//! Value records shared by the checkers and the report builder.

pub mod alignment;
pub mod category;
pub mod quality;
pub mod quote;
pub mod token;
pub mod verdict;

pub use alignment::{AlignmentEntry, AlignmentResult, Position};
pub use category::InsertionCategory;
pub use quality::{
    DimensionScore, OracleCallStats, QualityAssessment, QualityDimension, RefinementSession,
    RefinementVerdict, Rubric, RubricDimension, ScoreScale,
};
pub use quote::{MatchResult, MatchStatus, Quote, SourceSpan};
pub use token::{Token, TokenKind};
pub use verdict::Verdict;
