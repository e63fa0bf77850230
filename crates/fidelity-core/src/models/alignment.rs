//! Alignment of a source token stream against a transformed one.

use serde::{Deserialize, Serialize};

use super::{InsertionCategory, Token};

/// Location of a token: index in its stream plus byte offset in its text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub index: usize,
    pub offset: usize,
}

/// One step of an alignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AlignmentEntry {
    /// Source word reproduced in the transformed stream.
    Preserved {
        source: Position,
        transformed: Position,
        word: String,
    },
    /// Source word reproduced through an inline correction.
    Altered {
        source: Position,
        transformed: Position,
        original: String,
        corrected: String,
    },
    /// Transformed content that needs no source counterpart.
    ToleratedInsertion {
        transformed: Position,
        category: InsertionCategory,
        text: String,
    },
    /// Source word with no counterpart in the transformed stream.
    Missing { source: Position, word: String },
    /// Transformed content nothing explains (fabricated).
    Inserted { transformed: Position, text: String },
}

impl AlignmentEntry {
    /// Source position, for entries that consume a source token.
    pub fn source(&self) -> Option<Position> {
        match self {
            Self::Preserved { source, .. }
            | Self::Altered { source, .. }
            | Self::Missing { source, .. } => Some(*source),
            _ => None,
        }
    }

    /// Transformed position, for entries that consume a transformed token.
    pub fn transformed(&self) -> Option<Position> {
        match self {
            Self::Preserved { transformed, .. }
            | Self::Altered { transformed, .. }
            | Self::ToleratedInsertion { transformed, .. }
            | Self::Inserted { transformed, .. } => Some(*transformed),
            Self::Missing { .. } => None,
        }
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, Self::Missing { .. } | Self::Inserted { .. })
    }
}

/// Ordered alignment of a source stream against a transformed stream.
///
/// Every source content token appears in exactly one Preserved, Altered or
/// Missing entry. Source constructs of a tolerated category are held in
/// `exempt` and are not part of the content stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentResult {
    pub entries: Vec<AlignmentEntry>,
    pub source_token_count: usize,
    pub transformed_token_count: usize,
    pub exempt: Vec<Token>,
}

impl AlignmentResult {
    pub fn preserved_count(&self) -> usize {
        self.count(|e| matches!(e, AlignmentEntry::Preserved { .. }))
    }

    pub fn altered_count(&self) -> usize {
        self.count(|e| matches!(e, AlignmentEntry::Altered { .. }))
    }

    pub fn missing_count(&self) -> usize {
        self.count(|e| matches!(e, AlignmentEntry::Missing { .. }))
    }

    pub fn inserted_count(&self) -> usize {
        self.count(|e| matches!(e, AlignmentEntry::Inserted { .. }))
    }

    pub fn tolerated_count(&self) -> usize {
        self.count(|e| matches!(e, AlignmentEntry::ToleratedInsertion { .. }))
    }

    /// (Preserved + Altered) / source tokens. 1.0 for an empty source stream.
    pub fn preservation_ratio(&self) -> f64 {
        if self.source_token_count == 0 {
            return 1.0;
        }
        (self.preserved_count() + self.altered_count()) as f64 / self.source_token_count as f64
    }

    pub fn has_violations(&self) -> bool {
        self.entries.iter().any(AlignmentEntry::is_violation)
    }

    fn count(&self, pred: impl Fn(&AlignmentEntry) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(e)).count()
    }
}
