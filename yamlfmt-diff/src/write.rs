use camino::Utf8Path;
use fs_err as fs;
use std::io::{self, Write};
use tracing::debug;

/// Replace `path` with `contents` through a sibling temp file and a rename.
///
/// An existing file keeps its permissions; a new file gets mode 0644 on unix.
pub fn write_atomic(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    };
    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    match permissions {
        Some(perms) => tmp.as_file().set_permissions(perms)?,
        None => set_default_permissions(tmp.as_file())?,
    }
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path, bytes = contents.len(), "wrote file");
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(file: &std::fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_file: &std::fs::File) -> io::Result<()> {
    Ok(())
}
