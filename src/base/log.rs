//! Module containing structures and implementations for logging messages to the user.

use colored::Colorize;
use std::fmt::Display;

/// Represent the severity of a log message to be printed to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum Severity {
    Error,
    Info,
    Warning,
}

/// Struct implementing [`Display`] that represents a log message to be displayed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Message<T> {
    /// The severity of the log message.
    pub severity: Severity,

    /// The message to be displayed.
    pub display: T,
}
impl<T> Message<T> {
    /// Create a new log message with the given severity and message to be displayed.
    pub fn new(severity: Severity, display: T) -> Self {
        Self { severity, display }
    }
}

impl<T: Display> Display for Message<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let log_header = (match self.severity {
            Severity::Error => "[error]:".red(),
            Severity::Info => "[info]:".green(),
            Severity::Warning => "[warning]:".yellow(),
        })
        .bold();

        let message_part = &self.display.to_string().bold();

        write!(f, "{log_header} {message_part}")
    }
}

/// Structure implementing [`Display`] that prints a source line with a caret under one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLineDisplay<'a> {
    /// The text of the line, possibly still carrying its terminator.
    pub line_text: &'a str,

    /// Line number shown in the gutter (starts at 1).
    pub line_number: usize,

    /// Column the caret points at (starts at 1).
    pub offset: usize,
}

impl<'a> SourceLineDisplay<'a> {
    /// Create a new display for the given line, pointing at `offset`.
    #[must_use]
    pub fn new(line_text: &'a str, line_number: usize, offset: usize) -> Self {
        Self {
            line_text,
            line_number,
            offset,
        }
    }
}

impl Display for SourceLineDisplay<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let gutter = self.line_number.to_string();
        let padding = " ".repeat(gutter.len());
        let text = self.line_text.trim_end_matches(['\r', '\n']);

        // keep tabs so the caret lines up with the text above it
        let indent = text
            .chars()
            .take(self.offset.saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect::<String>();

        writeln!(f, "{padding} {}", "|".blue().bold())?;
        writeln!(f, "{} {} {text}", gutter.blue().bold(), "|".blue().bold())?;
        write!(
            f,
            "{padding} {} {indent}{}",
            "|".blue().bold(),
            "^".red().bold()
        )
    }
}
