//! Whole-file atomic rewrites.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use super::{RepositoryError, RepositoryResult};

/// Replace `path` with `contents`.
///
/// The data is written and synced to a sibling temporary file which is then
/// renamed over the target. Missing parent directories are created.
pub fn write_atomic(path: &Path, contents: &[u8]) -> RepositoryResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| RepositoryError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| RepositoryError::io(dir, e))?;
    tmp.write_all(contents)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| RepositoryError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| RepositoryError::io(path, e.error))?;

    tracing::debug!("Rewrote {} ({} bytes)", path.display(), contents.len());
    Ok(())
}
