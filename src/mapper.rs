//! Source-to-output path mapping
//!
//! Pure functions: the output location of a source file is fully determined
//! by its position under the source root and the two configured roots. No
//! filesystem access happens here.
//!
//! The mapping rule is relative-parent substitution: for a source file at
//! `<sourceRoot>/X/sass/<name>.scss` the artifact lands at
//! `<outputRoot>/X/css/<name>.css`, preserving every path segment in `X`.

use std::path::{Path, PathBuf};

use crate::error::{SasscadeError, SasscadeResult};

/// Base name of the output-side directory replacing `sass`
pub const CSS_DIR_NAME: &str = "css";

/// Extension of compiled artifacts
pub const CSS_EXTENSION: &str = "css";

/// Compute the destination directory for a sass directory
///
/// The sass directory's parent is relativized against `source_root` and
/// re-rooted under `output_root` with a trailing `css` segment. A sass
/// directory that is not under `source_root` cannot be relativized and is
/// rejected rather than mapped outside the output tree.
pub fn css_dir_for(
    sass_dir: &Path,
    source_root: &Path,
    output_root: &Path,
) -> SasscadeResult<PathBuf> {
    let parent = sass_dir.parent().unwrap_or(sass_dir);
    let relative = parent
        .strip_prefix(source_root)
        .map_err(|_| SasscadeError::OutsideSourceRoot {
            path: sass_dir.to_path_buf(),
            root: source_root.to_path_buf(),
        })?;
    Ok(output_root.join(relative).join(CSS_DIR_NAME))
}

/// Replace the final extension of a file name with `.css`
///
/// Exactly the last extension component is stripped; a name without an
/// extension keeps its stem and gains `.css`.
pub fn css_file_name(source_name: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(source_name);
    format!("{stem}.{CSS_EXTENSION}")
}

/// Compute the output artifact path for one source file
pub fn css_path_for(source_file: &Path, css_dir: &Path) -> PathBuf {
    let name = source_file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    css_dir.join(css_file_name(name))
}
