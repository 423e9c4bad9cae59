//! Filesystem write helpers
//!
//! Artifacts are written atomically: content goes to a temporary file in
//! the destination directory, then renames into place.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::error::SasscadeResult;

/// Create a file's parent directory, recursively, if missing
///
/// Succeeds silently when the directory already exists.
pub fn ensure_parent_dir(path: &Path) -> SasscadeResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Write content to a file atomically
///
/// Uses tempfile + rename so a failed write never leaves a truncated
/// artifact behind.
pub fn atomic_write(path: &Path, content: &[u8]) -> SasscadeResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn atomic_write_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("styles.css");

        atomic_write(&path, b"body { color: red; }").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "body { color: red; }");
    }

    #[test]
    fn atomic_write_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("styles.css");

        fs::write(&path, "original").unwrap();
        atomic_write(&path, b"replaced").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "replaced");
    }

    #[test]
    fn ensure_parent_dir_creates_missing_chain() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("com/acme/css/styles.css");

        ensure_parent_dir(&path).unwrap();

        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn ensure_parent_dir_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("css/styles.css");

        ensure_parent_dir(&path).unwrap();
        ensure_parent_dir(&path).unwrap();

        assert!(path.parent().unwrap().is_dir());
    }
}
