//! Line oriented input sources that feed the lexer.

use std::{
    fmt::Debug,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use crate::lexical::ReadError;

use super::Error;

/// Longest line, in bytes, a reader accepts unless configured otherwise.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1_000_000;

/// Source name reported by readers over in-memory text, e.g. pasted content.
pub const CLIPBOARD_SOURCE: &str = "clipboard";

/// A source of text lines together with positional metadata.
///
/// Implementations own their input; the lexer owns the readers it is given and drops them when
/// they are popped off its reader stack.
pub trait LineReader: Debug {
    /// Reads the next line, including its line terminator if it had one.
    ///
    /// An empty line is returned as its bare terminator, so a returned line is never empty.
    /// Returns [`None`] once the source is exhausted.
    ///
    /// # Errors
    /// - If the underlying input fails, is not valid UTF-8, or the line exceeds the maximum
    ///   line length of the reader.
    fn read_line(&mut self) -> Result<Option<&str>, ReadError>;

    /// Number of the line returned by the last successful [`LineReader::read_line`] call.
    ///
    /// Numbering starts at 1, it is 0 before the first line has been read.
    fn line_number(&self) -> usize;

    /// Human readable name of the source, e.g. a file path or [`CLIPBOARD_SOURCE`].
    fn source(&self) -> &str;
}

/// Reads lines from a buffered reader, typically an open file.
#[derive(Debug)]
pub struct FileLineReader<R = BufReader<File>> {
    reader: R,
    source: String,
    line: String,
    line_number: usize,
    max_line_length: usize,
}

impl FileLineReader {
    /// Creates a reader over an already open file, reported under `source`.
    pub fn new(file: File, source: impl Into<String>) -> Self {
        Self::from_reader(BufReader::new(file), source)
    }

    /// Opens the file at `path` and reports it under its display path.
    ///
    /// # Errors
    /// - [`Error::IoError`]: The file could not be opened.
    pub fn open(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)
            .map_err(|err| Error::IoError(format!("{}: {err}", path.display())))?;
        Ok(Self::new(file, path.display().to_string()))
    }
}

impl<R: BufRead> FileLineReader<R> {
    /// Creates a reader over any buffered reader, reported under `source`.
    pub fn from_reader(reader: R, source: impl Into<String>) -> Self {
        Self {
            reader,
            source: source.into(),
            line: String::new(),
            line_number: 0,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    /// Sets the longest line, in bytes, this reader accepts.
    #[must_use]
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }

    fn error(&self, message: impl Into<String>) -> ReadError {
        ReadError::new(self.source.clone(), self.line_number + 1, message)
    }
}

impl<R: BufRead + Debug> LineReader for FileLineReader<R> {
    fn read_line(&mut self) -> Result<Option<&str>, ReadError> {
        self.line.clear();

        let read = self
            .reader
            .read_line(&mut self.line)
            .map_err(|err| self.error(err.to_string()))?;

        if read == 0 {
            return Ok(None);
        }

        if content_length(&self.line) > self.max_line_length {
            return Err(self.error(format!(
                "Maximum line length of {} bytes exceeded",
                self.max_line_length
            )));
        }

        self.line_number += 1;

        Ok(Some(self.line.as_str()))
    }

    fn line_number(&self) -> usize {
        self.line_number
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Reads lines from an in-memory text buffer.
#[derive(Debug, Clone)]
pub struct StringLineReader {
    text: String,
    position: usize,
    source: String,
    line_number: usize,
    max_line_length: usize,
}

impl StringLineReader {
    /// Creates a reader over `text`, reported as [`CLIPBOARD_SOURCE`].
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_source(text, CLIPBOARD_SOURCE)
    }

    /// Creates a reader over `text`, reported under `source`.
    pub fn with_source(text: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            position: 0,
            source: source.into(),
            line_number: 0,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }

    /// Sets the longest line, in bytes, this reader accepts.
    #[must_use]
    pub fn with_max_line_length(mut self, max_line_length: usize) -> Self {
        self.max_line_length = max_line_length;
        self
    }
}

impl LineReader for StringLineReader {
    fn read_line(&mut self) -> Result<Option<&str>, ReadError> {
        let start = self.position;
        let Some(rest) = self.text.get(start..).filter(|rest| !rest.is_empty()) else {
            return Ok(None);
        };

        let len = rest.find('\n').map_or(rest.len(), |index| index + 1);

        if content_length(&rest[..len]) > self.max_line_length {
            return Err(ReadError::new(
                self.source.clone(),
                self.line_number + 1,
                format!(
                    "Maximum line length of {} bytes exceeded",
                    self.max_line_length
                ),
            ));
        }

        self.position += len;
        self.line_number += 1;

        Ok(Some(&self.text[start..start + len]))
    }

    fn line_number(&self) -> usize {
        self.line_number
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Length of a line without its terminator.
fn content_length(line: &str) -> usize {
    line.trim_end_matches(['\r', '\n']).len()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn string_reader_yields_lines_with_terminators() {
        let mut reader = StringLineReader::new("(pcb\n\n  x)");

        assert_eq!(reader.source(), CLIPBOARD_SOURCE);
        assert_eq!(reader.line_number(), 0);
        assert_eq!(reader.read_line().unwrap(), Some("(pcb\n"));
        assert_eq!(reader.read_line().unwrap(), Some("\n"));
        assert_eq!(reader.read_line().unwrap(), Some("  x)"));
        assert_eq!(reader.line_number(), 3);
        assert_eq!(reader.read_line().unwrap(), None);
        assert_eq!(reader.line_number(), 3);
    }

    #[test]
    fn string_reader_rejects_long_lines() {
        let mut reader = StringLineReader::with_source("short\nmuch too long\n", "board.dsn")
            .with_max_line_length(8);

        assert_eq!(reader.read_line().unwrap(), Some("short\n"));

        let err = reader.read_line().unwrap_err();
        assert_eq!(err.source_name(), "board.dsn");
        assert_eq!(err.line_number(), 2);
    }

    #[test]
    fn file_reader_reads_from_buffer() {
        let mut reader = FileLineReader::from_reader(Cursor::new("a\r\nb"), "mem.dsn");

        assert_eq!(reader.read_line().unwrap(), Some("a\r\n"));
        assert_eq!(reader.read_line().unwrap(), Some("b"));
        assert_eq!(reader.read_line().unwrap(), None);
        assert_eq!(reader.line_number(), 2);
        assert_eq!(reader.source(), "mem.dsn");
    }

    #[test]
    fn file_reader_reports_invalid_utf8() {
        let bytes: &[u8] = &[b'(', 0xff, 0xfe, b'\n'];
        let mut reader = FileLineReader::from_reader(Cursor::new(bytes), "bad.dsn");

        let err = reader.read_line().unwrap_err();
        assert_eq!(err.line_number(), 1);
    }
}
