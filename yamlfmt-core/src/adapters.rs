//! Default port implementations.

use crate::ports::SourceReader;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::collections::BTreeMap;

/// Reads documents from the filesystem.
#[derive(Debug, Clone, Default)]
pub struct FsSourceReader;

impl SourceReader for FsSourceReader {
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("read {}", path))
    }
}

/// In-memory documents for embedding and testing.
///
/// Paths are compared with `/` separators so callers on Windows can look up
/// entries registered with forward slashes.
#[derive(Debug, Clone, Default)]
pub struct InMemorySourceReader {
    files: BTreeMap<String, Vec<u8>>,
}

impl InMemorySourceReader {
    pub fn new<P, I>(files: I) -> Self
    where
        P: Into<Utf8PathBuf>,
        I: IntoIterator<Item = (P, Vec<u8>)>,
    {
        let mut reader = Self::default();
        for (path, contents) in files {
            reader.insert(path, contents);
        }
        reader
    }

    pub fn insert(&mut self, path: impl Into<Utf8PathBuf>, contents: Vec<u8>) {
        self.files.insert(normalize(&path.into()), contents);
    }
}

impl SourceReader for InMemorySourceReader {
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>> {
        self.files
            .get(&normalize(path))
            .cloned()
            .with_context(|| format!("read {}: no such file", path))
    }
}

fn normalize(path: &Utf8Path) -> String {
    path.as_str().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn in_memory_returns_registered_bytes() {
        let reader = InMemorySourceReader::new([("a.yaml", b"a: 1\n".to_vec())]);
        assert_eq!(reader.read(Utf8Path::new("a.yaml")).unwrap(), b"a: 1\n");
    }

    #[test]
    fn in_memory_normalizes_separators() {
        let reader = InMemorySourceReader::new([("dir/a.yaml", b"a: 1\n".to_vec())]);
        assert!(reader.read(Utf8Path::new("dir\\a.yaml")).is_ok());
    }

    #[test]
    fn in_memory_missing_file_names_path() {
        let reader = InMemorySourceReader::default();
        let err = reader.read(Utf8Path::new("gone.yaml")).unwrap_err();
        assert!(err.to_string().contains("gone.yaml"));
    }

    #[test]
    fn fs_reader_reads_and_reports_missing() {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        let path = root.join("doc.yaml");
        std::fs::write(&path, "k: v\n").unwrap();

        assert_eq!(FsSourceReader.read(&path).unwrap(), b"k: v\n");
        let err = FsSourceReader.read(&root.join("missing.yaml")).unwrap_err();
        assert!(format!("{:#}", err).contains("missing.yaml"));
    }
}
