use std::cell::Cell;

use crate::lexical;

use super::{
    log::{Message, Severity, SourceLineDisplay},
    Error,
};

/// Represents a trait responsible for handling diagnostics produced while lexing.
pub trait Handler<T> {
    /// Receive an error and handles it.
    fn receive(&self, error: T);
}

/// Handler that prints every received error to stderr.
#[derive(Debug, Default)]
pub struct PrintHandler {
    printed: Cell<bool>,
}

impl PrintHandler {
    /// Creates a new [`PrintHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether at least one error has been printed.
    #[must_use]
    pub fn has_printed(&self) -> bool {
        self.printed.get()
    }
}

impl Handler<lexical::Error> for PrintHandler {
    fn receive(&self, error: lexical::Error) {
        match &error {
            lexical::Error::Syntax(syntax) => eprintln!(
                "{}\n{}",
                Message::new(Severity::Error, syntax),
                SourceLineDisplay::new(
                    syntax.line_text(),
                    syntax.line_number(),
                    syntax.offset()
                )
            ),
            lexical::Error::Read(read) => eprintln!("{}", Message::new(Severity::Error, read)),
        }
        self.printed.set(true);
    }
}

impl Handler<Error> for PrintHandler {
    fn receive(&self, error: Error) {
        match error {
            Error::LexicalError(error) => <Self as Handler<lexical::Error>>::receive(self, error),
            other => {
                eprintln!("{}", Message::new(Severity::Error, other));
                self.printed.set(true);
            }
        }
    }
}

/// Handler that only remembers whether an error was received.
#[derive(Debug, Default)]
pub struct SilentHandler {
    received: Cell<bool>,
}

impl SilentHandler {
    /// Creates a new [`SilentHandler`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether at least one error has been received.
    #[must_use]
    pub fn has_received(&self) -> bool {
        self.received.get()
    }
}

impl<T> Handler<T> for SilentHandler {
    fn receive(&self, _error: T) {
        self.received.set(true);
    }
}

/// Handler that discards every error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoidHandler;

impl<T> Handler<T> for VoidHandler {
    fn receive(&self, _error: T) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_handler_remembers_errors() {
        let handler = SilentHandler::new();
        assert!(!handler.has_received());

        handler.receive(Error::Other("boom"));
        assert!(handler.has_received());
    }

    #[test]
    fn print_handler_marks_printed() {
        let handler = PrintHandler::new();
        handler.receive(Error::IoError("file not found".to_string()));
        assert!(handler.has_printed());
    }
}
