//! Contains the [`ReaderStack`] used for nested file inclusion.

use crate::base::line_reader::LineReader;

/// Strictly nested stack of input sources, the bottom one of which can never be removed.
#[derive(Debug)]
pub struct ReaderStack {
    bottom: Box<dyn LineReader>,
    nested: Vec<Box<dyn LineReader>>,
}

impl ReaderStack {
    /// Creates a stack holding only `bottom`.
    #[must_use]
    pub fn new(bottom: Box<dyn LineReader>) -> Self {
        Self {
            bottom,
            nested: Vec::new(),
        }
    }

    /// Makes `reader` the active source.
    pub fn push(&mut self, reader: Box<dyn LineReader>) {
        self.nested.push(reader);
    }

    /// Removes and returns the active source, unless it is the bottom one.
    pub fn pop(&mut self) -> Option<Box<dyn LineReader>> {
        self.nested.pop()
    }

    /// Gets the active source.
    #[must_use]
    pub fn top(&self) -> &dyn LineReader {
        self.nested.last().unwrap_or(&self.bottom).as_ref()
    }

    /// Gets the active source mutably.
    pub fn top_mut(&mut self) -> &mut dyn LineReader {
        self.nested.last_mut().unwrap_or(&mut self.bottom).as_mut()
    }

    /// Number of sources on the stack, never less than 1.
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.nested.len() + 1
    }

    /// Whether only the bottom source is left.
    #[must_use]
    pub fn is_bottom(&self) -> bool {
        self.nested.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use crate::base::line_reader::StringLineReader;

    use super::*;

    #[test]
    fn bottom_reader_cannot_be_popped() {
        let mut stack = ReaderStack::new(Box::new(StringLineReader::with_source("a", "main.dsn")));
        assert_eq!(stack.len(), 1);
        assert!(stack.pop().is_none());
        assert_eq!(stack.top().source(), "main.dsn");

        stack.push(Box::new(StringLineReader::with_source("b", "include.dsn")));
        assert_eq!(stack.len(), 2);
        assert!(!stack.is_bottom());
        assert_eq!(stack.top_mut().read_line().unwrap(), Some("b"));

        let popped = stack.pop().unwrap();
        assert_eq!(popped.source(), "include.dsn");
        assert!(stack.is_bottom());
        assert_eq!(stack.top().source(), "main.dsn");
    }
}
