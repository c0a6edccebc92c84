//! Port traits abstracting file reads away from the engine.

use camino::Utf8Path;

/// Source of document bytes.
pub trait SourceReader: Send + Sync {
    fn read(&self, path: &Utf8Path) -> anyhow::Result<Vec<u8>>;
}
