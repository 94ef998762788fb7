//! Turn-level diagnostics and load-time error formatting.
//!
//! Nothing in a turn is fatal: every condition the interpreter runs into while
//! reading an utterance becomes a [`Diagnostic`] attached to the turn outcome.
//! Load-time failures (dataset or vocabulary files) are real errors and go
//! through [`error_message`] so they all read the same way.

use std::fmt;

/// Prefix every load-time error message with the program name.
pub fn error_message(msg: impl Into<String>) -> String {
    format!("ggspeak: {}", msg.into())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// No keyword, column or modifier was recognized in the utterance.
    Unrecognized,

    /// A token looked like a column reference but nothing was close enough.
    NoMatch { token: String },

    /// A token is equally close to several columns; nothing was picked.
    Ambiguous {
        token: String,
        candidates: Vec<String>,
    },

    /// A token was corrected to a column name (homophone table or edit distance).
    Corrected { token: String, column: String },

    /// Matched columns that had nowhere to go this turn.
    ColumnsIgnored { columns: Vec<String> },

    /// A grouping candidate is already one of the primary columns.
    GroupingIsPrimary { column: String },

    /// Geometry could not be inferred from the number of primary columns.
    CannotInferGeometry { columns: usize },

    /// The spec has no dataset attached, so columns cannot be resolved.
    DatasetUnavailable,

    /// A save was requested while the current spec is not renderable.
    NothingToSave,
}

impl Diagnostic {
    /// Diagnostics that only narrate what happened, as opposed to reporting
    /// input the interpreter could not use.
    pub fn is_informational(&self) -> bool {
        matches!(self, Diagnostic::Corrected { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Unrecognized => {
                write!(f, "Did not catch any matching variable names or chart words.")
            }
            Diagnostic::NoMatch { token } => write!(f, "No variable sounds like '{}'.", token),
            Diagnostic::Ambiguous { token, candidates } => write!(
                f,
                "'{}' could be any of [{}]; say the variable name again.",
                token,
                candidates.join(", ")
            ),
            Diagnostic::Corrected { token, column } => {
                write!(f, "Heard '{}', using variable '{}'.", token, column)
            }
            Diagnostic::ColumnsIgnored { columns } => write!(
                f,
                "Ignored variables [{}]; say 'reset' to start a new plot or 'color by' to group.",
                columns.join(", ")
            ),
            Diagnostic::GroupingIsPrimary { column } => {
                write!(f, "'{}' is already plotted; cannot also group by it.", column)
            }
            Diagnostic::CannotInferGeometry { columns } => {
                write!(f, "Couldn't identify geometry of graph from {} variables.", columns)
            }
            Diagnostic::DatasetUnavailable => write!(f, "No dataset is loaded."),
            Diagnostic::NothingToSave => write!(f, "Nothing to save; the current graph is not valid."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_lists_candidates() {
        let d = Diagnostic::Ambiguous {
            token: "z".to_string(),
            candidates: vec!["x".to_string(), "y".to_string()],
        };
        assert_eq!(
            d.to_string(),
            "'z' could be any of [x, y]; say the variable name again."
        );
        assert!(!d.is_informational());
    }

    #[test]
    fn error_message_is_prefixed() {
        assert_eq!(error_message("bad file"), "ggspeak: bad file");
    }
}
