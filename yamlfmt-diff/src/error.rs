//! Error types for applying formatted output to disk.

use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

/// A single failed write.
#[derive(Debug, Error)]
#[error("write {path}: {source}")]
pub struct ApplyError {
    /// File that could not be written.
    pub path: Utf8PathBuf,

    /// Underlying I/O failure.
    #[source]
    pub source: std::io::Error,
}

/// Every write that failed during [`FileDiffs::apply_all`](crate::FileDiffs::apply_all).
///
/// Writes that succeeded before or after a failure stay on disk.
#[derive(Debug, Default)]
pub struct ApplyErrors {
    errors: Vec<ApplyError>,
}

impl ApplyErrors {
    pub fn new(errors: Vec<ApplyError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ApplyError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_inner(self) -> Vec<ApplyError> {
        self.errors
    }
}

impl fmt::Display for ApplyErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApplyErrors {}

impl IntoIterator for ApplyErrors {
    type Item = ApplyError;
    type IntoIter = std::vec::IntoIter<ApplyError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
