//! Source tree scanning
//!
//! Discovers `sass` convention directories under the source root and lists
//! the compilable `.scss` files directly inside each one. Both operations
//! read the filesystem fresh on every run; nothing is cached or persisted.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;

use crate::error::{SasscadeError, SasscadeResult};

/// Base name marking a directory as containing compilable stylesheets
pub const SASS_DIR_NAME: &str = "sass";

/// Suffix of recognized source files
pub const SASS_SUFFIX: &str = ".scss";

/// Leading marker of partial files, which are imported rather than
/// compiled standalone
pub const PARTIAL_PREFIX: char = '_';

/// Check whether a file name is an independently compilable source
///
/// A name qualifies iff it ends with `.scss` and does not start with the
/// partial marker `_`.
pub fn is_compilable(file_name: &str) -> bool {
    !file_name.starts_with(PARTIAL_PREFIX) && file_name.ends_with(SASS_SUFFIX)
}

/// Find every directory named `sass` under the source root
///
/// Returned paths are relative to `source_root`, sorted. Hidden entries and
/// VCS metadata are skipped via the walker's standard filters. A missing
/// source root means "no sources found" and yields an empty result; an I/O
/// failure mid-walk is fatal.
pub fn find_sass_dirs(source_root: &Path) -> SasscadeResult<Vec<PathBuf>> {
    if !source_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    let walker = WalkBuilder::new(source_root).standard_filters(true).build();

    for entry in walker {
        let entry = entry.map_err(|e| SasscadeError::Scan {
            path: source_root.to_path_buf(),
            source: std::io::Error::other(e),
        })?;
        let path = entry.path();

        if path == source_root {
            continue;
        }

        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        if is_dir && path.file_name() == Some(OsStr::new(SASS_DIR_NAME)) {
            if let Ok(relative) = path.strip_prefix(source_root) {
                dirs.push(relative.to_path_buf());
            }
        }
    }

    dirs.sort();
    Ok(dirs)
}

/// List the compilable `.scss` files directly inside a sass directory
///
/// Non-recursive: subdirectories of a convention directory are not
/// descended into. Returns full paths, sorted. An empty directory yields
/// an empty list; a directory that cannot be listed is fatal.
pub fn list_sass_files(sass_dir: &Path) -> SasscadeResult<Vec<PathBuf>> {
    let entries = fs::read_dir(sass_dir).map_err(|e| SasscadeError::Scan {
        path: sass_dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| SasscadeError::Scan {
            path: sass_dir.to_path_buf(),
            source: e,
        })?;

        let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
        if !is_file {
            continue;
        }

        let name = entry.file_name();
        if name.to_str().map(is_compilable).unwrap_or(false) {
            files.push(entry.path());
        }
    }

    files.sort();
    Ok(files)
}
