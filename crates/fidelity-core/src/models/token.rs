use serde::{Deserialize, Serialize};

use super::InsertionCategory;

/// One unit of a tokenized stream.
///
/// `offset` is the byte offset of `surface` in the text it came from.
/// Offsets within one stream are strictly increasing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Canonical comparison form (see `normalize`). Empty for constructs.
    pub normalized: String,
    /// Text exactly as it appears in the stream.
    pub surface: String,
    pub offset: usize,
    pub kind: TokenKind,
}

/// What a token stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TokenKind {
    /// An ordinary word.
    Word,
    /// A multi-word construct of a tolerated category, kept atomic.
    /// `words` are the normalized words it decorates (`host` for
    /// `**Host:**`); empty for pure markup such as bullets.
    Construct {
        category: InsertionCategory,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        words: Vec<String>,
    },
    /// An inline correction `original [sic] (corrected)`.
    Correction { original: String, corrected: String },
}

impl Token {
    pub fn word(normalized: String, surface: &str, offset: usize) -> Self {
        Self {
            normalized,
            surface: surface.to_string(),
            offset,
            kind: TokenKind::Word,
        }
    }

    /// Byte offset just past the surface text.
    pub fn end(&self) -> usize {
        self.offset + self.surface.len()
    }

    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Word)
    }

    /// Category of a construct token, `None` for words and corrections.
    pub fn construct_category(&self) -> Option<InsertionCategory> {
        match &self.kind {
            TokenKind::Construct { category, .. } => Some(*category),
            _ => None,
        }
    }

    /// Words decorated by a construct token; empty for anything else.
    pub fn construct_words(&self) -> &[String] {
        match &self.kind {
            TokenKind::Construct { words, .. } => words,
            _ => &[],
        }
    }
}
