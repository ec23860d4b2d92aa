//! Contains the [`DsnLexer`], which turns lines of DSN text into [`Token`]s.

use std::fs::File;

use itertools::Itertools as _;

use crate::base::line_reader::{FileLineReader, LineReader, StringLineReader};

use super::{
    error::{Error, Expected, SyntaxError},
    keyword::{KeywordId, KeywordTable},
    reader_stack::ReaderStack,
    token::{QuoteChar, Token, TokenKind},
};

/// Characters that start a line comment when they begin a token.
const COMMENT_MARKERS: [char; 2] = ['#', ';'];

/// Spelling of the directive that announces a new string delimiter.
const STRING_QUOTE: &str = "string_quote";

/// Lexical rules a grammar may change between calls to [`DsnLexer::next_token`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LexerOptions {
    /// Character that opens and closes a quoted string.
    pub string_delimiter: char,
    /// Whether blanks are allowed inside quoted strings instead of terminating them.
    pub space_in_quoted_tokens: bool,
    /// Whether comments are returned as [`TokenKind::Comment`] tokens instead of skipped.
    pub comments_are_tokens: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            string_delimiter: '"',
            space_in_quoted_tokens: true,
            comments_are_tokens: false,
        }
    }
}

/// Lexical analyzer for the SPECCTRA DSN format.
///
/// The lexer reads lines from the active source on its [`ReaderStack`] and hands out one
/// [`Token`] per [`DsnLexer::next_token`] call. It never resolves keywords on its own: symbols
/// are returned as [`TokenKind::Symbol`] and a grammar looks them up with
/// [`DsnLexer::find_token`] or [`Token::resolved`].
#[derive(Debug)]
pub struct DsnLexer<'k> {
    readers: ReaderStack,
    keywords: &'k KeywordTable,
    options: LexerOptions,
    /// Snapshot of the current line, terminator included.
    line: String,
    /// Byte index of the next unread character in `line`.
    next: usize,
    /// Byte index where the content of `line` ends, terminator excluded.
    limit: usize,
    at_eof: bool,
    previous_kind: TokenKind,
    token: Token,
}

impl<'k> DsnLexer<'k> {
    /// Creates a lexer reading from `reader` with default [`LexerOptions`].
    #[must_use]
    pub fn new(reader: Box<dyn LineReader>, keywords: &'k KeywordTable) -> Self {
        Self::with_options(reader, keywords, LexerOptions::default())
    }

    /// Creates a lexer reading from `reader` with the given options.
    #[must_use]
    pub fn with_options(
        reader: Box<dyn LineReader>,
        keywords: &'k KeywordTable,
        options: LexerOptions,
    ) -> Self {
        Self {
            readers: ReaderStack::new(reader),
            keywords,
            options,
            line: String::new(),
            next: 0,
            limit: 0,
            at_eof: false,
            previous_kind: TokenKind::None,
            token: Token::default(),
        }
    }

    /// Creates a lexer over an already open file, reported under `source_name`.
    #[must_use]
    pub fn from_file(
        file: File,
        source_name: impl Into<String>,
        keywords: &'k KeywordTable,
    ) -> Self {
        Self::new(Box::new(FileLineReader::new(file, source_name)), keywords)
    }

    /// Creates a lexer over in-memory text such as pasted clipboard content.
    #[must_use]
    pub fn from_text(text: impl Into<String>, keywords: &'k KeywordTable) -> Self {
        Self::new(Box::new(StringLineReader::new(text)), keywords)
    }

    /// Makes `reader` the active source, e.g. for an included file.
    ///
    /// The rest of the current line is dropped, so an include directive should end its line.
    pub fn push_reader(&mut self, reader: Box<dyn LineReader>) {
        tracing::debug!(
            source = reader.source(),
            depth = self.readers.len() + 1,
            "Entering nested source"
        );

        self.readers.push(reader);
        self.next = self.limit;
        self.at_eof = false;
    }

    /// Drops the active source and returns to the one that pushed it.
    ///
    /// Reading resumes at the start of the next line of the enclosing source. Returns `false`,
    /// changing nothing, if only the first source is left.
    pub fn pop_reader(&mut self) -> bool {
        let Some(reader) = self.readers.pop() else {
            return false;
        };

        tracing::debug!(
            source = reader.source(),
            resumed = self.readers.top().source(),
            depth = self.readers.len(),
            "Leaving nested source"
        );

        self.next = self.limit;
        self.at_eof = false;
        true
    }

    /// Reads the next token and returns its kind.
    ///
    /// # Errors
    /// - [`Error::Read`]: The active source failed to supply a line.
    /// - [`Error::Syntax`]: A `string_quote` directive is not followed by a valid delimiter.
    pub fn next_token(&mut self) -> Result<TokenKind, Error> {
        self.previous_kind = self.token.kind();

        let token = self.scan()?;

        tracing::trace!(
            kind = ?token.kind(),
            text = %token.text(),
            line = self.current_line_number(),
            offset = token.line_offset(),
            "Read token"
        );

        self.token = token;
        Ok(self.token.kind())
    }

    fn scan(&mut self) -> Result<Token, Error> {
        if self.at_eof {
            return Ok(self.end_of_file());
        }

        loop {
            if self.next >= self.limit && !self.read_line()? {
                self.at_eof = true;
                return Ok(self.end_of_file());
            }

            self.skip_blanks();

            let start = self.next;
            let Some(character) = self.char_at(start) else {
                continue;
            };

            if self.previous_kind == TokenKind::StringQuote {
                return self.scan_quote_definition(start, character);
            }

            match character {
                '(' => return Ok(self.single(start, TokenKind::LeftBracket)),
                ')' => return Ok(self.single(start, TokenKind::RightBracket)),
                c if c == self.options.string_delimiter => {
                    return Ok(self.scan_quoted_string(start));
                }
                c if COMMENT_MARKERS.contains(&c) => {
                    if self.options.comments_are_tokens {
                        return Ok(self.scan_comment(start));
                    }
                    self.next = self.limit;
                }
                '-' if self.is_dash(start) => return Ok(self.single(start, TokenKind::Dash)),
                _ => return Ok(self.scan_word(start)),
            }
        }
    }

    /// Pulls the next line of the active source, returns `false` once it is exhausted.
    fn read_line(&mut self) -> Result<bool, Error> {
        match self.readers.top_mut().read_line()? {
            Some(text) => {
                self.line.clear();
                self.line.push_str(text);
                self.next = 0;
                self.limit = self.line.trim_end_matches(['\r', '\n']).len();
                Ok(true)
            }
            None => {
                self.next = self.limit;
                Ok(false)
            }
        }
    }

    fn char_at(&self, index: usize) -> Option<char> {
        self.line.get(index..self.limit)?.chars().next()
    }

    /// 1 based column of the byte at `index` in the current line.
    fn column(&self, index: usize) -> usize {
        self.line[..index].chars().count() + 1
    }

    fn skip_blanks(&mut self) {
        while let Some(character) = self.char_at(self.next) {
            if !is_blank(character) {
                break;
            }
            self.next += character.len_utf8();
        }
    }

    fn end_of_file(&self) -> Token {
        Token::new(TokenKind::EndOfFile, String::new(), self.column(self.limit))
    }

    fn single(&mut self, start: usize, kind: TokenKind) -> Token {
        self.next = start + 1;
        Token::new(kind, &self.line[start..self.next], self.column(start))
    }

    /// A `-` is a dash unless it signs a number; one glued to a preceding token, as in
    /// `"U2"-14`, is always a dash.
    fn is_dash(&self, start: usize) -> bool {
        let mut following = self.line[start + 1..self.limit].chars();
        let signs_number = match following.next() {
            Some('.') => following.next().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        };
        let glued = self.line[..start]
            .chars()
            .next_back()
            .is_some_and(|c| !is_blank(c) && !is_bracket(c));

        !signs_number || glued
    }

    fn scan_quoted_string(&mut self, start: usize) -> Token {
        let delimiter = self.options.string_delimiter;
        let content_start = start + delimiter.len_utf8();

        let mut head = content_start;
        while let Some(character) = self.char_at(head) {
            if character == delimiter
                || (!self.options.space_in_quoted_tokens && is_blank(character))
            {
                break;
            }
            head += character.len_utf8();
        }

        // an unterminated string is closed by the end of its line
        self.next = self
            .char_at(head)
            .map_or(self.limit, |terminator| head + terminator.len_utf8());

        Token::new(
            TokenKind::QuotedString,
            &self.line[content_start..head],
            self.column(start),
        )
    }

    fn scan_comment(&mut self, start: usize) -> Token {
        let from = if self.line[..start].chars().all(is_blank) {
            0
        } else {
            start
        };
        self.next = self.limit;

        Token::new(
            TokenKind::Comment,
            &self.line[from..self.limit],
            self.column(from),
        )
    }

    fn scan_word(&mut self, start: usize) -> Token {
        let mut head = start;
        while let Some(character) = self.char_at(head) {
            if is_blank(character)
                || is_bracket(character)
                || (head > start && character == self.options.string_delimiter)
            {
                break;
            }
            head += character.len_utf8();
        }
        self.next = head;

        let text = &self.line[start..head];
        let kind = if is_number(text) {
            TokenKind::Number
        } else if text.eq_ignore_ascii_case(STRING_QUOTE) {
            TokenKind::StringQuote
        } else {
            TokenKind::Symbol
        };

        Token::new(kind, text, self.column(start))
    }

    fn scan_quote_definition(&mut self, start: usize, character: char) -> Result<Token, Error> {
        let offset = self.column(start);
        let error = || {
            self.error_at(
                format!(
                    "String delimiter must be a single character of {}",
                    QuoteChar::listing()
                ),
                offset,
            )
        };

        let quote = QuoteChar::from_char(character).ok_or_else(error)?;

        let head = start + character.len_utf8();
        if self
            .char_at(head)
            .is_some_and(|c| !is_blank(c) && !is_bracket(c))
        {
            return Err(error());
        }
        self.next = head;

        Ok(Token::new(
            TokenKind::QuoteDefinitionChar,
            quote.as_char().to_string(),
            offset,
        ))
    }

    /// Reads the next token, which must be a `(`.
    ///
    /// # Errors
    /// - [`Error::Syntax`]: The token is not a `(`.
    /// - [`Error::Read`]: The active source failed to supply a line.
    pub fn need_left(&mut self) -> Result<(), Error> {
        if self.next_token()? != TokenKind::LeftBracket {
            return Err(self.expecting(TokenKind::LeftBracket));
        }
        Ok(())
    }

    /// Reads the next token, which must be a `)`.
    ///
    /// # Errors
    /// - [`Error::Syntax`]: The token is not a `)`.
    /// - [`Error::Read`]: The active source failed to supply a line.
    pub fn need_right(&mut self) -> Result<(), Error> {
        if self.next_token()? != TokenKind::RightBracket {
            return Err(self.expecting(TokenKind::RightBracket));
        }
        Ok(())
    }

    /// Reads the next token, which must satisfy [`TokenKind::is_symbolic`].
    ///
    /// # Errors
    /// - [`Error::Syntax`]: The token is not symbolic.
    /// - [`Error::Read`]: The active source failed to supply a line.
    pub fn need_symbol(&mut self) -> Result<TokenKind, Error> {
        let kind = self.next_token()?;
        if !kind.is_symbolic() {
            return Err(self.expecting(TokenKind::Symbol));
        }
        Ok(kind)
    }

    /// Reads the next token, which must be symbolic or a number.
    ///
    /// # Errors
    /// - [`Error::Syntax`]: The token is neither symbolic nor a number.
    /// - [`Error::Read`]: The active source failed to supply a line.
    pub fn need_symbol_or_number(&mut self) -> Result<TokenKind, Error> {
        let kind = self.next_token()?;
        if !kind.is_symbolic() && kind != TokenKind::Number {
            return Err(self.expecting("symbol|number"));
        }
        Ok(kind)
    }

    /// Reads the next token, which must be a number needed for `expectation`.
    ///
    /// # Errors
    /// - [`Error::Syntax`]: The token is not a number.
    /// - [`Error::Read`]: The active source failed to supply a line.
    pub fn need_number(&mut self, expectation: &str) -> Result<(), Error> {
        if self.next_token()? != TokenKind::Number {
            return Err(self.error_at(
                format!("need a NUMBER for '{expectation}'"),
                self.current_column_offset(),
            ));
        }
        Ok(())
    }

    /// Reads the next token, which must be a symbol spelling a known keyword.
    ///
    /// # Errors
    /// - [`Error::Syntax`]: The token is not a symbol, or not a known keyword.
    /// - [`Error::Read`]: The active source failed to supply a line.
    pub fn need_keyword(&mut self) -> Result<KeywordId, Error> {
        let kind = self.next_token()?;
        if let Some(id) = self.token.keyword(self.keywords) {
            return Ok(id);
        }
        if kind != TokenKind::Symbol {
            return Err(self.expecting("keyword"));
        }

        let text = self.current_token_text();
        let similar = self.keywords.similar(text);
        let message = if similar.is_empty() {
            format!("Unexpected '{text}'")
        } else {
            format!(
                "Unexpected '{text}', did you mean {}?",
                similar.iter().map(|name| format!("'{name}'")).join(", ")
            )
        };
        Err(self.error_at(message, self.current_column_offset()))
    }

    /// Builds an error stating that `expected` was expected at the current token.
    #[must_use]
    pub fn expecting(&self, expected: impl Into<Expected>) -> Error {
        let message = format!("Expecting {}", self.describe(expected.into()));
        self.error_at(message, self.current_column_offset())
    }

    /// Builds an error stating that `unexpected` was not expected at the current token.
    #[must_use]
    pub fn unexpected(&self, unexpected: impl Into<Expected>) -> Error {
        let message = format!("Unexpected {}", self.describe(unexpected.into()));
        self.error_at(message, self.current_column_offset())
    }

    /// Builds an error stating that `kind` occurs more than once.
    #[must_use]
    pub fn duplicate(&self, kind: TokenKind) -> Error {
        let message = format!("{} is a duplicate", self.token_string(kind));
        self.error_at(message, self.current_column_offset())
    }

    /// Builds an error located at column `offset` of the current line.
    #[must_use]
    pub fn error_at(&self, message: impl Into<String>, offset: usize) -> Error {
        SyntaxError::new(
            message,
            self.current_source_name(),
            self.current_line_number(),
            offset,
            self.line.as_str(),
        )
        .into()
    }

    fn describe(&self, expected: Expected) -> String {
        match expected {
            Expected::Kind(kind) => self.token_string(kind),
            Expected::Text(text) => text,
        }
    }

    /// Names `kind` for diagnostics, keywords by their spelling.
    #[must_use]
    pub fn token_text(&self, kind: TokenKind) -> &str {
        match kind.syntax() {
            Some(text) => text,
            None => kind
                .as_keyword()
                .and_then(|id| self.keywords.name(*id))
                .unwrap_or("unknown keyword"),
        }
    }

    /// Names `kind` for diagnostics, wrapped in single quotes.
    #[must_use]
    pub fn token_string(&self, kind: TokenKind) -> String {
        format!("'{}'", self.token_text(kind))
    }

    /// Looks `text` up in the keyword table, ignoring case.
    #[must_use]
    pub fn find_token(&self, text: &str) -> Option<KeywordId> {
        self.keywords.find_token(text)
    }

    /// Gets the keyword table the lexer was built with.
    #[must_use]
    pub fn keywords(&self) -> &'k KeywordTable {
        self.keywords
    }

    /// Gets the current token.
    #[must_use]
    pub fn current_token(&self) -> &Token {
        &self.token
    }

    /// Gets the kind the last [`DsnLexer::next_token`] call returned.
    #[must_use]
    pub fn current_token_kind(&self) -> TokenKind {
        self.token.kind()
    }

    /// Gets the kind the second to last [`DsnLexer::next_token`] call returned.
    #[must_use]
    pub fn previous_token_kind(&self) -> TokenKind {
        self.previous_kind
    }

    /// Gets the text of the current token.
    #[must_use]
    pub fn current_token_text(&self) -> &str {
        self.token.text()
    }

    /// Gets the line number within the active source.
    #[must_use]
    pub fn current_line_number(&self) -> usize {
        self.readers.top().line_number()
    }

    /// Gets the name of the active source, e.g. a file name or `clipboard`.
    #[must_use]
    pub fn current_source_name(&self) -> &str {
        self.readers.top().source()
    }

    /// Gets the column of the current token within its line (starts at 1).
    #[must_use]
    pub fn current_column_offset(&self) -> usize {
        self.token.line_offset()
    }

    /// Gets the current lexical rules.
    #[must_use]
    pub fn options(&self) -> LexerOptions {
        self.options
    }

    /// Gets the character delimiting quoted strings.
    #[must_use]
    pub fn string_delimiter(&self) -> char {
        self.options.string_delimiter
    }

    /// Changes the character delimiting quoted strings and returns the previous one.
    pub fn set_string_delimiter(&mut self, delimiter: char) -> char {
        std::mem::replace(&mut self.options.string_delimiter, delimiter)
    }

    /// Gets whether blanks are allowed inside quoted strings.
    #[must_use]
    pub fn space_in_quoted_tokens(&self) -> bool {
        self.options.space_in_quoted_tokens
    }

    /// Changes whether blanks are allowed inside quoted strings and returns the previous setting.
    pub fn set_space_in_quoted_tokens(&mut self, allowed: bool) -> bool {
        std::mem::replace(&mut self.options.space_in_quoted_tokens, allowed)
    }

    /// Gets whether comments are returned as tokens.
    #[must_use]
    pub fn comments_are_tokens(&self) -> bool {
        self.options.comments_are_tokens
    }

    /// Changes whether comments are returned as tokens and returns the previous setting.
    pub fn set_comments_are_tokens(&mut self, as_tokens: bool) -> bool {
        std::mem::replace(&mut self.options.comments_are_tokens, as_tokens)
    }
}

fn is_blank(character: char) -> bool {
    matches!(character, ' ' | '\t' | '\r' | '\n' | '\0')
}

fn is_bracket(character: char) -> bool {
    matches!(character, '(' | ')')
}

/// Checks `text` against `[+-]? (digits [. digits?] | . digits) ([eE] [+-]? digits)?`.
fn is_number(text: &str) -> bool {
    fn digits(bytes: &[u8]) -> usize {
        bytes.iter().take_while(|b| b.is_ascii_digit()).count()
    }

    let bytes = text.as_bytes();
    let mut index = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));

    let whole = digits(&bytes[index..]);
    index += whole;

    let mut fraction = 0;
    if bytes.get(index) == Some(&b'.') {
        index += 1;
        fraction = digits(&bytes[index..]);
        index += fraction;
    }

    if whole + fraction == 0 {
        return false;
    }

    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        let exponent = digits(&bytes[index..]);
        if exponent == 0 {
            return false;
        }
        index += exponent;
    }

    index == bytes.len()
}
