//! Engine error types.
//!
//! [`EngineError`] describes a pipeline failure on one buffer.
//! [`FileError`] attaches the path it happened on, and [`ErrorList`]
//! collects every per-file failure of a batch in input order.

use camino::{Utf8Path, Utf8PathBuf};
use std::fmt;
use thiserror::Error;
use yamlfmt_diff::ApplyError;
use yamlfmt_feature::{Cancelled, FeatureApplyError};
use yamlfmt_schema::SchemaError;

/// Failure of the feature/formatter pipeline on a single buffer.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Feature(#[from] FeatureApplyError),

    #[error("formatter {type_tag} failed: {source:#}")]
    Formatter {
        type_tag: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

/// Failure while processing one file of a batch.
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{path}: {source:#}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("{path}: {source}")]
    Schema {
        path: Utf8PathBuf,
        #[source]
        source: SchemaError,
    },

    #[error("{path}: {source}")]
    Feature {
        path: Utf8PathBuf,
        #[source]
        source: FeatureApplyError,
    },

    #[error("{path}: formatter {type_tag} failed: {source:#}")]
    Formatter {
        path: Utf8PathBuf,
        type_tag: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Write(#[from] ApplyError),

    #[error("{path}: operation cancelled")]
    Cancelled { path: Utf8PathBuf },
}

impl FileError {
    /// Attach `path` to a pipeline failure.
    pub fn from_engine(path: impl Into<Utf8PathBuf>, err: EngineError) -> Self {
        let path = path.into();
        match err {
            EngineError::Feature(source) => FileError::Feature { path, source },
            EngineError::Formatter { type_tag, source } => FileError::Formatter {
                path,
                type_tag,
                source,
            },
            EngineError::Cancelled(_) => FileError::Cancelled { path },
        }
    }

    pub fn path(&self) -> &Utf8Path {
        match self {
            FileError::Read { path, .. }
            | FileError::Schema { path, .. }
            | FileError::Feature { path, .. }
            | FileError::Formatter { path, .. }
            | FileError::Cancelled { path } => path,
            FileError::Write(err) => &err.path,
        }
    }

    /// Short machine-readable category.
    pub fn kind(&self) -> &'static str {
        match self {
            FileError::Read { .. } => "read",
            FileError::Schema { .. } => "schema",
            FileError::Feature { .. } => "feature",
            FileError::Formatter { .. } => "formatter",
            FileError::Write(_) => "write",
            FileError::Cancelled { .. } => "cancelled",
        }
    }
}

/// Every per-file failure of a batch, in the order it was recorded.
#[derive(Debug, Default)]
pub struct ErrorList(Vec<FileError>);

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: FileError) {
        self.0.push(err);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<FileError> {
        self.0
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ErrorList {}

impl Extend<FileError> for ErrorList {
    fn extend<I: IntoIterator<Item = FileError>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<FileError> for ErrorList {
    fn from_iter<I: IntoIterator<Item = FileError>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ErrorList {
    type Item = FileError;
    type IntoIter = std::vec::IntoIter<FileError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorList {
    type Item = &'a FileError;
    type IntoIter = std::slice::Iter<'a, FileError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use yamlfmt_feature::FeatureApplyMode;

    #[test]
    fn feature_error_keeps_path_and_cause() {
        let inner = FeatureApplyError::new(
            "boom",
            FeatureApplyMode::After,
            anyhow::anyhow!("exploded"),
        );
        let err = FileError::from_engine("a.yaml", EngineError::from(inner));
        assert_eq!(err.path(), "a.yaml");
        assert_eq!(err.kind(), "feature");
        let msg = err.to_string();
        assert!(msg.starts_with("a.yaml: "));
        assert!(msg.contains("Feature boom AfterAction failed"));
        assert!(err.source().is_some());
    }

    #[test]
    fn write_error_reports_its_own_path() {
        let err = FileError::from(ApplyError {
            path: "w.yaml".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(err.path(), "w.yaml");
        assert_eq!(err.to_string(), "write w.yaml: denied");
    }

    #[test]
    fn list_display_is_one_error_per_line() {
        let errors: ErrorList = vec![
            FileError::Cancelled { path: "a.yaml".into() },
            FileError::Schema {
                path: "b.yaml".into(),
                source: SchemaError::Compile {
                    url: "s.json".into(),
                    message: "unreachable".into(),
                },
            },
        ]
        .into_iter()
        .collect();
        assert_eq!(
            errors.to_string(),
            "a.yaml: operation cancelled\nb.yaml: compile schema s.json: unreachable"
        );
    }
}
