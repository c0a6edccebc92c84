//! Diff accounting for formatted YAML files.
//!
//! A [`FormatDiff`] pairs the original bytes of a document with its
//! formatted bytes. [`FileDiff`] attaches the source path and
//! [`FileDiffs`] aggregates a batch in input order: counting changes,
//! rendering output for humans or scripts, and writing results back.

pub mod error;
mod line_ending;
mod render;
mod write;

pub use error::{ApplyError, ApplyErrors};
pub use line_ending::LineEnding;
pub use render::multiline_diff;
pub use write::write_atomic;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::debug;

/// Original and formatted content of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatDiff {
    pub original: Vec<u8>,
    pub formatted: Vec<u8>,
    /// Separator for rendered diffs; empty means detect from `original`.
    pub line_sep: String,
}

impl FormatDiff {
    pub fn new(original: Vec<u8>, formatted: Vec<u8>, line_sep: impl Into<String>) -> Self {
        Self {
            original,
            formatted,
            line_sep: line_sep.into(),
        }
    }

    /// Byte inequality of original and formatted content.
    pub fn changed(&self) -> bool {
        self.original != self.formatted
    }

    /// Rendered unified diff and its changed line count.
    pub fn multiline_diff(&self) -> (String, usize) {
        multiline_diff(
            &String::from_utf8_lossy(&self.original),
            &String::from_utf8_lossy(&self.formatted),
            &self.line_sep,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: Utf8PathBuf,
    pub diff: FormatDiff,
}

impl FileDiff {
    pub fn new(path: impl Into<Utf8PathBuf>, diff: FormatDiff) -> Self {
        Self {
            path: path.into(),
            diff,
        }
    }

    pub fn changed(&self) -> bool {
        self.diff.changed()
    }

    /// `"{path}:\n{diff}\n"`.
    pub fn str_output(&self) -> String {
        let (diff, _) = self.diff.multiline_diff();
        format!("{}:\n{}\n", self.path, diff)
    }

    pub fn str_output_quiet(&self) -> &str {
        self.path.as_str()
    }

    /// Write the formatted content to `path`.
    pub fn apply(&self) -> Result<(), ApplyError> {
        write_atomic(&self.path, &self.diff.formatted).map_err(|source| ApplyError {
            path: self.path.clone(),
            source,
        })
    }
}

/// Ordered batch of per-file diffs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDiffs(Vec<FileDiff>);

impl FileDiffs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diff: FileDiff) {
        self.0.push(diff);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileDiff> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<FileDiff> {
        self.0
    }

    pub fn changed_count(&self) -> usize {
        self.0.iter().filter(|fd| fd.changed()).count()
    }

    pub fn changed_paths(&self) -> Vec<&Utf8Path> {
        self.0
            .iter()
            .filter(|fd| fd.changed())
            .map(|fd| fd.path.as_path())
            .collect()
    }

    /// Full diff rendering of every changed file.
    pub fn str_output(&self) -> String {
        self.0
            .iter()
            .filter(|fd| fd.changed())
            .map(FileDiff::str_output)
            .collect()
    }

    /// One changed path per line.
    pub fn str_output_quiet(&self) -> String {
        self.0
            .iter()
            .filter(|fd| fd.changed())
            .map(|fd| format!("{}\n", fd.str_output_quiet()))
            .collect()
    }

    /// Write every changed file, continuing past failures.
    ///
    /// Unchanged entries are skipped. Not transactional: writes that
    /// succeeded stay committed when a later one fails.
    pub fn apply_all(&self) -> Result<(), ApplyErrors> {
        let mut errors = Vec::new();
        for fd in self.0.iter().filter(|fd| fd.changed()) {
            if let Err(err) = fd.apply() {
                debug!(path = %fd.path, error = %err.source, "apply failed");
                errors.push(err);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ApplyErrors::new(errors))
        }
    }
}

impl FromIterator<FileDiff> for FileDiffs {
    fn from_iter<I: IntoIterator<Item = FileDiff>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FileDiffs {
    type Item = FileDiff;
    type IntoIter = std::vec::IntoIter<FileDiff>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FileDiffs {
    type Item = &'a FileDiff;
    type IntoIter = std::slice::Iter<'a, FileDiff>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn diff(path: &str, original: &str, formatted: &str) -> FileDiff {
        FileDiff::new(
            path,
            FormatDiff::new(original.into(), formatted.into(), "\n"),
        )
    }

    #[test]
    fn changed_is_byte_inequality() {
        assert!(!FormatDiff::new(b"a: 1\n".to_vec(), b"a: 1\n".to_vec(), "").changed());
        assert!(FormatDiff::new(b"a: 1\n".to_vec(), b"a: 1\r\n".to_vec(), "").changed());
    }

    #[test]
    fn str_output_only_includes_changed_files() {
        let diffs: FileDiffs = vec![
            diff("same.yaml", "a: 1\n", "a: 1\n"),
            diff("moved.yaml", "a:\n    b: 1", "a:\n  b: 1\n"),
        ]
        .into_iter()
        .collect();

        assert_eq!(diffs.changed_count(), 1);
        let out = diffs.str_output();
        assert!(out.starts_with("moved.yaml:\n@@"));
        assert!(out.ends_with('\n'));
        assert!(!out.contains("same.yaml"));
        assert_eq!(diffs.str_output_quiet(), "moved.yaml\n");
    }

    #[test]
    fn quiet_output_keeps_input_order() {
        let diffs: FileDiffs = vec![
            diff("z.yaml", "a:  1\n", "a: 1\n"),
            diff("a.yaml", "b:  1\n", "b: 1\n"),
        ]
        .into_iter()
        .collect();
        assert_eq!(diffs.str_output_quiet(), "z.yaml\na.yaml\n");
        assert_eq!(
            diffs.changed_paths(),
            vec![Utf8Path::new("z.yaml"), Utf8Path::new("a.yaml")]
        );
    }

    #[test]
    fn apply_all_on_unchanged_batch_touches_nothing() {
        let diffs: FileDiffs = vec![diff("/nonexistent/dir/a.yaml", "a: 1\n", "a: 1\n")]
            .into_iter()
            .collect();
        assert!(diffs.apply_all().is_ok());
    }
}
