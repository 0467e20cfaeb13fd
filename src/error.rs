//! Error types.

use thiserror::Error;

/// A fatal SGF syntax error. No partial tree is ever returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The text does not start with `(`
    #[error("expected '(' at start of game tree (offset {offset})")]
    MissingRoot { offset: usize },

    /// A `[` without its closing `]`
    #[error("unterminated property value starting at offset {offset}")]
    UnterminatedValue { offset: usize },

    /// End of input inside an open `(`
    #[error("game tree opened at offset {offset} is never closed")]
    UnclosedTree { offset: usize },

    /// A character that cannot appear at this point of the grammar
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { offset: usize, found: char },

    /// A `[` with no property identifier before it
    #[error("property value without identifier at offset {offset}")]
    MissingIdentifier { offset: usize },

    /// `()` at the root, or a game tree whose first token is not `;`
    #[error("game tree without nodes at offset {offset}")]
    EmptyTree { offset: usize },
}

impl ParseError {
    /// Byte offset into the input where the problem was detected.
    pub fn offset(&self) -> usize {
        match *self {
            ParseError::MissingRoot { offset }
            | ParseError::UnterminatedValue { offset }
            | ParseError::UnclosedTree { offset }
            | ParseError::Unexpected { offset, .. }
            | ParseError::MissingIdentifier { offset }
            | ParseError::EmptyTree { offset } => offset,
        }
    }
}
