//! The lexical module is responsible for converting DSN text into a stream of tokens that a
//! grammar can consume.

pub mod keyword;
pub mod lexer;
pub mod reader_stack;
pub mod token;

mod error;
pub use error::{Error, Expected, ReadError, SyntaxError};

#[doc(inline)]
pub use lexer::{DsnLexer, LexerOptions};
