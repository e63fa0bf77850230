use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A category of transformed-stream content permitted to have no
/// corresponding source token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionCategory {
    /// Markdown heading line (`## Part One`).
    Heading,
    /// Bold speaker label (`**Dr. Kerr:**`).
    SpeakerLabel,
    /// List bullets, blockquote markers, horizontal rules.
    StructuralMarker,
    /// Bracketed or parenthesized timestamps (`[00:12:31]`).
    Timestamp,
    /// Bracketed non-speech annotations (`[Applause]`, `[inaudible]`).
    Annotation,
    /// Transformed tokens skipped by the bounded lookahead.
    Realignment,
}

impl InsertionCategory {
    pub const ALL: [InsertionCategory; 6] = [
        Self::Heading,
        Self::SpeakerLabel,
        Self::StructuralMarker,
        Self::Timestamp,
        Self::Annotation,
        Self::Realignment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Heading => "heading",
            Self::SpeakerLabel => "speaker_label",
            Self::StructuralMarker => "structural_marker",
            Self::Timestamp => "timestamp",
            Self::Annotation => "annotation",
            Self::Realignment => "realignment",
        }
    }
}

impl fmt::Display for InsertionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InsertionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| format!("unknown insertion category '{s}'"))
    }
}
