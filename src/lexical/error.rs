use derive_more::From;
use getset::{CopyGetters, Getters};

use super::token::TokenKind;

/// Represents an error that occurred during the lexical analysis of a DSN source.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
}

/// The input source could not supply the next line.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters, thiserror::Error)]
#[error("{message} while reading \"{source_name}\", line {line_number}")]
pub struct ReadError {
    /// Name of the source that failed.
    #[get = "pub"]
    source_name: String,

    /// Number of the line that could not be read.
    #[get_copy = "pub"]
    line_number: usize,

    /// Description of the failure.
    #[get = "pub"]
    message: String,
}

impl ReadError {
    /// Creates a new [`ReadError`].
    pub fn new(
        source_name: impl Into<String>,
        line_number: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            line_number,
            message: message.into(),
        }
    }
}

/// The token stream does not match what the grammar requires at some location.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters, thiserror::Error)]
#[error("{message} in \"{source_name}\", line {line_number}, offset {offset}")]
pub struct SyntaxError {
    /// Description of what was expected or unexpected.
    #[get = "pub"]
    message: String,

    /// Name of the source the offending token came from.
    #[get = "pub"]
    source_name: String,

    /// Line of the offending token (starts at 1).
    #[get_copy = "pub"]
    line_number: usize,

    /// Column of the offending character (starts at 1).
    #[get_copy = "pub"]
    offset: usize,

    /// Text of the line the error points into.
    #[get = "pub"]
    line_text: String,
}

impl SyntaxError {
    /// Creates a new [`SyntaxError`].
    pub fn new(
        message: impl Into<String>,
        source_name: impl Into<String>,
        line_number: usize,
        offset: usize,
        line_text: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            source_name: source_name.into(),
            line_number,
            offset,
            line_text: line_text.into(),
        }
    }
}

/// What a grammar expected, or rejected, at the current location.
#[derive(Debug, Clone, PartialEq, Eq, From)]
pub enum Expected {
    /// A token kind, named the way [`super::DsnLexer::token_string`] names it.
    Kind(TokenKind),
    /// Free form text, used verbatim.
    Text(String),
}

impl From<&str> for Expected {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}
