//! Filesystem port used by the link store.

use std::io;
use std::path::Path;

/// Whole-file reads and writes.
pub trait FileSystem: Send + Sync {
    /// Reads a file as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replaces the file contents, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Returns `true` if the path exists.
    fn exists(&self, path: &Path) -> bool;
}
