//! Contains the [`Token`] struct and its related types.

use enum_as_inner::EnumAsInner;
use getset::{CopyGetters, Getters};
use itertools::Itertools as _;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use super::keyword::{KeywordId, KeywordTable};

/// Is an enumeration containing all kinds of tokens the DSN lexer produces.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumAsInner)]
pub enum TokenKind {
    /// No token has been read yet.
    None,
    /// A line comment, returned only when comments are tokens.
    Comment,
    /// The `string_quote` directive.
    StringQuote,
    /// The single character following a `string_quote` directive.
    QuoteDefinitionChar,
    /// A `-` that is not the sign of a number.
    Dash,
    /// A run of characters that is neither a number nor a quoted string.
    Symbol,
    /// A numeric literal.
    Number,
    /// `)`
    RightBracket,
    /// `(`
    LeftBracket,
    /// A quoted string, stripped of its delimiters.
    QuotedString,
    /// The input is exhausted.
    EndOfFile,
    /// A symbol resolved against a [`KeywordTable`].
    Keyword(KeywordId),
}

impl TokenKind {
    /// Whether the kind may stand in for a symbol: a symbol, a quoted string, or any keyword.
    #[must_use]
    pub fn is_symbolic(self) -> bool {
        matches!(self, Self::Symbol | Self::QuotedString | Self::Keyword(_))
    }

    /// Describes the kind for diagnostics, or [`None`] for keywords which need their table.
    #[must_use]
    pub fn syntax(self) -> Option<&'static str> {
        Some(match self {
            Self::None => "NONE",
            Self::Comment => "comment",
            Self::StringQuote => "string_quote",
            Self::QuoteDefinitionChar => "quoted text delimiter",
            Self::Dash => "-",
            Self::Symbol => "symbol",
            Self::Number => "number",
            Self::RightBracket => ")",
            Self::LeftBracket => "(",
            Self::QuotedString => "quoted string",
            Self::EndOfFile => "end of file",
            Self::Keyword(_) => return None,
        })
    }
}

/// Represents a single classified unit of DSN input.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Getters, CopyGetters)]
pub struct Token {
    /// Get the kind of the token.
    #[get_copy = "pub"]
    kind: TokenKind,

    /// Get the text of the token; quoted strings are stripped of their delimiters.
    #[get = "pub"]
    text: String,

    /// Get the column of the first character of the token within its line (starts at 1).
    #[get_copy = "pub"]
    line_offset: usize,
}

impl Token {
    /// Creates a new token.
    pub fn new(kind: TokenKind, text: impl Into<String>, line_offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line_offset,
        }
    }

    /// Looks the token up in `keywords` if it is a symbol.
    #[must_use]
    pub fn keyword(&self, keywords: &KeywordTable) -> Option<KeywordId> {
        match self.kind {
            TokenKind::Symbol => keywords.find_token(&self.text),
            TokenKind::Keyword(id) => Some(id),
            _ => None,
        }
    }

    /// Returns the token with its kind replaced by the keyword it spells, if any.
    #[must_use]
    pub fn resolved(self, keywords: &KeywordTable) -> Self {
        match self.keyword(keywords) {
            Some(id) => Self {
                kind: TokenKind::Keyword(id),
                ..self
            },
            None => self,
        }
    }
}

impl Default for Token {
    fn default() -> Self {
        Self::new(TokenKind::None, String::new(), 0)
    }
}

/// The characters a `string_quote` directive may select as the string delimiter.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
#[allow(missing_docs)]
pub enum QuoteChar {
    Single,
    Double,
    Dollar,
}

impl QuoteChar {
    /// Gets the character this variant stands for.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
            Self::Dollar => '$',
        }
    }

    /// Gets the variant for `character`, if it is an accepted delimiter.
    #[must_use]
    pub fn from_char(character: char) -> Option<Self> {
        Self::iter().find(|quote| quote.as_char() == character)
    }

    /// Lists the accepted delimiters, e.g. `', ", or $`.
    #[must_use]
    pub fn listing() -> String {
        let chars = Self::iter().map(Self::as_char).collect::<Vec<_>>();
        match chars.split_last() {
            Some((last, rest)) if !rest.is_empty() => {
                format!("{}, or {last}", rest.iter().join(", "))
            }
            _ => chars.iter().join(""),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbolic_kinds() {
        assert!(TokenKind::Symbol.is_symbolic());
        assert!(TokenKind::QuotedString.is_symbolic());
        assert!(TokenKind::Keyword(KeywordId(3)).is_symbolic());
        assert!(!TokenKind::Number.is_symbolic());
        assert!(!TokenKind::Dash.is_symbolic());
    }

    #[test]
    fn quote_chars() {
        assert_eq!(QuoteChar::from_char('$'), Some(QuoteChar::Dollar));
        assert_eq!(QuoteChar::from_char('`'), None);
        assert_eq!(QuoteChar::listing(), "', \", or $");
    }

    #[test]
    fn tokens_resolve_against_keywords() {
        let keywords = KeywordTable::new([("via", KeywordId(7))]);

        let token = Token::new(TokenKind::Symbol, "VIA", 2).resolved(&keywords);
        assert_eq!(token.kind(), TokenKind::Keyword(KeywordId(7)));
        assert_eq!(token.text(), "VIA");
        assert_eq!(token.line_offset(), 2);

        let string = Token::new(TokenKind::QuotedString, "via", 1);
        assert_eq!(string.keyword(&keywords), None);
    }
}
