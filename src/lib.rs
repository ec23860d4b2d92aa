//! Lexical analyzer for the SPECCTRA DSN format.
//!
//! DSN is a parenthesis delimited, whitespace tolerant text format used to exchange routing and
//! placement data between EDA tools. This crate splits it into brackets, symbols, numbers, quoted
//! strings, dashes and comments for a recursive descent grammar to consume, and keeps a stack of
//! input sources so the grammar can follow include directives.

#![deny(
    missing_debug_implementations,
    missing_copy_implementations,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    clippy::missing_errors_doc
)]
#![warn(missing_docs, clippy::all, clippy::pedantic)]
#![allow(clippy::missing_panics_doc, clippy::missing_const_for_fn)]

pub mod base;
pub mod lexical;

use std::path::Path;

use base::{FileProvider, Handler, Result};
use lexical::{
    keyword::KeywordTable,
    token::{Token, TokenKind},
    DsnLexer,
};

/// Converts the source at `path` to tokens, the final one being [`TokenKind::EndOfFile`].
///
/// Symbols are not resolved against `keywords`; see [`Token::resolved`].
///
/// # Errors
/// - If the source cannot be opened.
/// - If a line of the source cannot be read.
/// - If a `string_quote` directive is not followed by a valid delimiter.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path.display()))]
pub fn tokenize(
    handler: &impl Handler<base::Error>,
    provider: &impl FileProvider,
    path: &Path,
    keywords: &KeywordTable,
) -> Result<Vec<Token>> {
    let reader = match provider.open(path) {
        Ok(reader) => reader,
        Err(err) => {
            handler.receive(err.clone());
            return Err(err);
        }
    };

    let mut lexer = DsnLexer::new(reader, keywords);
    let mut tokens = Vec::new();

    loop {
        match lexer.next_token() {
            Ok(kind) => {
                tokens.push(lexer.current_token().clone());
                if kind == TokenKind::EndOfFile {
                    break;
                }
            }
            Err(err) => {
                let err = base::Error::from(err);
                handler.receive(err.clone());
                return Err(err);
            }
        }
    }

    tracing::debug!(count = tokens.len(), "Tokenized source");

    Ok(tokens)
}
