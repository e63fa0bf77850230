use std::fmt;

use serde::{Deserialize, Serialize};

/// Per-item outcome of a check, ordered by severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The item is faithful to the source.
    Confirm,
    /// The evidence does not settle the question either way.
    Unclear,
    /// The item breaches a fidelity threshold.
    Deny,
}

impl Verdict {
    /// The most severe verdict in `verdicts`, `Confirm` when empty.
    pub fn worst<I: IntoIterator<Item = Verdict>>(verdicts: I) -> Verdict {
        verdicts.into_iter().max().unwrap_or(Verdict::Confirm)
    }

    pub fn is_deny(&self) -> bool {
        matches!(self, Self::Deny)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Confirm => "CONFIRM",
            Self::Unclear => "UNCLEAR",
            Self::Deny => "DENY",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_prefers_deny_over_unclear() {
        let v = Verdict::worst([Verdict::Confirm, Verdict::Deny, Verdict::Unclear]);
        assert_eq!(v, Verdict::Deny);
        assert_eq!(Verdict::worst([]), Verdict::Confirm);
        assert_eq!(
            Verdict::worst([Verdict::Unclear, Verdict::Confirm]),
            Verdict::Unclear
        );
    }
}
