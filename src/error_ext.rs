//! Error conversion helpers for I/O operations

use std::io;
use std::path::Path;

use crate::error::{InjectedError, InjectedResult};

/// Extension trait for converting `io::Result` to `InjectedResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// std::fs::read_to_string(&path)
    ///     .with_path_context("read settings", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> InjectedResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> InjectedResult<T> {
        self.map_err(|e| InjectedError::io(format!("{}: {}", action, path.display()), e))
    }
}
