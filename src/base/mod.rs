//! The base module contains the input plumbing and diagnostics shared by the lexer.

pub mod line_reader;

mod error;
#[doc(inline)]
pub use error::{Error, Result};

mod diagnostic;
pub use diagnostic::{Handler, PrintHandler, SilentHandler, VoidHandler};

mod file_provider;
pub use file_provider::{FileProvider, FsProvider, MemoryProvider};

pub mod log;
