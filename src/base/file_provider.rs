use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
};

use super::{
    line_reader::{FileLineReader, LineReader, StringLineReader},
    Error,
};

/// A trait for opening input sources by path, e.g. the targets of include directives.
pub trait FileProvider {
    /// Opens the source at the given path.
    ///
    /// # Errors
    /// - If the source does not exist.
    /// - If an error occurs while opening the source.
    fn open<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn LineReader>, Error>;
}

/// Provides sources from the file system.
#[derive(Debug, Clone)]
pub struct FsProvider {
    /// The root directory to base paths off of.
    root: PathBuf,
}

impl Default for FsProvider {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
        }
    }
}

impl<P> From<P> for FsProvider
where
    P: Into<PathBuf>,
{
    fn from(root: P) -> Self {
        Self { root: root.into() }
    }
}

impl FileProvider for FsProvider {
    fn open<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn LineReader>, Error> {
        let full_path = self.root.join(path);
        let file = File::open(&full_path)
            .map_err(|err| Error::IoError(format!("{}: {err}", full_path.display())))?;

        let source_name = std::env::current_dir()
            .ok()
            .and_then(|cwd| pathdiff::diff_paths(&full_path, cwd))
            .unwrap_or(full_path);

        Ok(Box::new(FileLineReader::new(
            file,
            source_name.display().to_string(),
        )))
    }
}

/// Provides sources from memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    files: HashMap<PathBuf, String>,
}

impl MemoryProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a source with the given content, replacing any previous one at `path`.
    pub fn add_file(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }
}

impl FileProvider for MemoryProvider {
    fn open<P: AsRef<Path>>(&self, path: P) -> Result<Box<dyn LineReader>, Error> {
        let path = path.as_ref();
        self.files
            .get(path)
            .map(|content| {
                Box::new(StringLineReader::with_source(
                    content.clone(),
                    path.display().to_string(),
                )) as Box<dyn LineReader>
            })
            .ok_or_else(|| Error::IoError(format!("File not found: {}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_provider() {
        let mut provider = MemoryProvider::new();
        provider.add_file("lib/parts.dsn", "(parts)\n");

        let mut reader = provider.open("lib/parts.dsn").unwrap();
        assert_eq!(reader.source(), "lib/parts.dsn");
        assert_eq!(reader.read_line().unwrap(), Some("(parts)\n"));

        assert!(matches!(
            provider.open("missing.dsn"),
            Err(Error::IoError(_))
        ));
    }

    #[test]
    fn fs_provider() {
        let root = std::env::temp_dir().join(format!("dsnlexer-fs-{}", std::process::id()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("board.dsn"), "(pcb board)\n").unwrap();

        let provider = FsProvider::from(&root);
        let mut reader = provider.open("board.dsn").unwrap();
        assert!(reader.source().ends_with("board.dsn"));
        assert_eq!(reader.read_line().unwrap(), Some("(pcb board)\n"));
        assert_eq!(reader.read_line().unwrap(), None);

        assert!(matches!(
            provider.open("missing.dsn"),
            Err(Error::IoError(_))
        ));

        std::fs::remove_dir_all(&root).unwrap();
    }
}
