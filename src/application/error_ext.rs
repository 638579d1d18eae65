//! Error conversion helpers for file reads
//!
//! Provides an extension trait for attaching path context to I/O errors.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

/// Extension trait for converting `io::Result` to `ApplicationResult` with context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    ///
    /// # Example
    /// ```ignore
    /// std::fs::read_to_string(&path)
    ///     .with_path_context("read script", &path)?;
    /// ```
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: format!("{}: {}", action, path.display()),
            source: Box::new(e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_io_error_when_adding_context_then_message_names_path() {
        let result: io::Result<()> = Err(io::Error::new(io::ErrorKind::NotFound, "gone"));
        let err = result
            .with_path_context("read script", Path::new("/tmp/missing.txt"))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "operation failed: read script: /tmp/missing.txt"
        );
    }
}
