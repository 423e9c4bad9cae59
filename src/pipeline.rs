//! Build orchestration
//!
//! Composes discovery, filtering, and path mapping into the full
//! source-to-output mapping, then drives compilation over it: one pass,
//! strictly sequential, aborting on the first failure. There is no
//! resumability; a failed run is rerun from scratch.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::compiler::StylesheetCompiler;
use crate::error::{SasscadeError, SasscadeResult};
use crate::mapper::{css_dir_for, css_path_for};
use crate::scan::{find_sass_dirs, list_sass_files};

/// One source file paired with its computed output artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedPair {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Options for one pipeline run
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Root scanned for sass directories
    pub source_root: PathBuf,
    /// Root receiving mirrored css directories
    pub output_root: PathBuf,
    /// Base directory for human-readable relative paths in logs
    pub base_dir: PathBuf,
}

/// Result of a completed run
#[derive(Debug, Clone, Default)]
pub struct BuildSummary {
    /// Number of compiled pairs
    pub compiled: usize,
}

/// Compute the full source-to-output mapping
///
/// Pairs are sorted by source path so runs over an unchanged tree produce
/// an identical mapping. Two sources computing the same output path is an
/// error naming both, never a silent overwrite.
pub fn build_mapping(source_root: &Path, output_root: &Path) -> SasscadeResult<Vec<MappedPair>> {
    let mut by_output: BTreeMap<PathBuf, PathBuf> = BTreeMap::new();

    for sass_dir in find_sass_dirs(source_root)? {
        let sass_dir = source_root.join(sass_dir);
        let css_dir = css_dir_for(&sass_dir, source_root, output_root)?;

        for source in list_sass_files(&sass_dir)? {
            let output = css_path_for(&source, &css_dir);
            if let Some(first) = by_output.get(&output) {
                return Err(SasscadeError::DuplicateOutput {
                    output,
                    first: first.clone(),
                    second: source,
                });
            }
            by_output.insert(output, source);
        }
    }

    let mut pairs: Vec<MappedPair> = by_output
        .into_iter()
        .map(|(output, source)| MappedPair { source, output })
        .collect();
    pairs.sort_by(|a, b| a.source.cmp(&b.source));
    Ok(pairs)
}

/// Make a path relative to `base` for display, falling back to the path
/// itself when it is not under `base`
pub fn display_relative<'a>(path: &'a Path, base: &Path) -> &'a Path {
    path.strip_prefix(base).unwrap_or(path)
}

/// Compile every mapped pair, in order
///
/// The mapping is computed in full before any compilation begins. For each
/// pair: `on_pair` receives the base-relative source and output paths, the
/// output parent directory is created, the source is compiled, and the
/// artifact is written atomically. The first failure aborts the run;
/// artifacts written before the failure stay on disk.
pub fn compile_all(
    options: &BuildOptions,
    compiler: &dyn StylesheetCompiler,
    mut on_pair: impl FnMut(&Path, &Path),
) -> SasscadeResult<BuildSummary> {
    let mapping = build_mapping(&options.source_root, &options.output_root)?;
    let mut summary = BuildSummary::default();

    for pair in &mapping {
        on_pair(
            display_relative(&pair.source, &options.base_dir),
            display_relative(&pair.output, &options.base_dir),
        );

        crate::fs::ensure_parent_dir(&pair.output)?;
        let css = compiler.compile(&pair.source)?;
        crate::fs::atomic_write(&pair.output, css.as_bytes())?;
        summary.compiled += 1;
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::ffi::OsStr;
    use std::fs;
    use tempfile::tempdir;

    /// Mock compiler recording every invocation, optionally failing on one
    /// file name
    struct ScriptedCompiler {
        fail_on: Option<&'static str>,
        compiled: RefCell<Vec<PathBuf>>,
    }

    impl ScriptedCompiler {
        fn new() -> Self {
            Self {
                fail_on: None,
                compiled: RefCell::new(Vec::new()),
            }
        }

        fn failing_on(name: &'static str) -> Self {
            Self {
                fail_on: Some(name),
                compiled: RefCell::new(Vec::new()),
            }
        }
    }

    impl StylesheetCompiler for ScriptedCompiler {
        fn compile(&self, source: &Path) -> SasscadeResult<String> {
            self.compiled.borrow_mut().push(source.to_path_buf());
            if let Some(fail_on) = self.fail_on {
                if source.file_name() == Some(OsStr::new(fail_on)) {
                    return Err(SasscadeError::Compile {
                        path: source.to_path_buf(),
                        message: "scripted failure".to_string(),
                    });
                }
            }
            Ok("/* compiled */\n".to_string())
        }
    }

    fn write_source(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_build_mapping_mirrors_tree() {
        let dir = tempdir().unwrap();
        let source_root = dir.path().join("resources");
        let output_root = dir.path().join("classes");
        write_source(&source_root, "com/acme/sass/styles.scss", "body {}");
        write_source(&source_root, "com/acme/sass/theme.scss", "body {}");
        write_source(&source_root, "widget/sass/app.scss", "body {}");

        let mapping = build_mapping(&source_root, &output_root).unwrap();

        assert_eq!(mapping.len(), 3);
        assert_eq!(
            mapping[0],
            MappedPair {
                source: source_root.join("com/acme/sass/styles.scss"),
                output: output_root.join("com/acme/css/styles.css"),
            }
        );
        assert_eq!(
            mapping[2].output,
            output_root.join("widget/css/app.css")
        );
    }

    #[test]
    fn test_build_mapping_excludes_partials() {
        let dir = tempdir().unwrap();
        let source_root = dir.path().join("resources");
        write_source(&source_root, "a/sass/styles.scss", "body {}");
        write_source(&source_root, "a/sass/_partials.scss", "$x: 1;");

        let mapping = build_mapping(&source_root, &dir.path().join("out")).unwrap();

        assert_eq!(mapping.len(), 1);
        assert!(mapping
            .iter()
            .all(|p| !p.source.ends_with("_partials.scss")));
    }

    #[test]
    fn test_build_mapping_empty_sass_dir_contributes_nothing() {
        let dir = tempdir().unwrap();
        let source_root = dir.path().join("resources");
        fs::create_dir_all(source_root.join("a/sass")).unwrap();
        write_source(&source_root, "b/sass/app.scss", "body {}");

        let mapping = build_mapping(&source_root, &dir.path().join("out")).unwrap();

        assert_eq!(mapping.len(), 1);
    }

    #[test]
    fn test_build_mapping_is_idempotent() {
        let dir = tempdir().unwrap();
        let source_root = dir.path().join("resources");
        let output_root = dir.path().join("out");
        write_source(&source_root, "x/sass/a.scss", "body {}");
        write_source(&source_root, "y/sass/b.scss", "body {}");

        let first = build_mapping(&source_root, &output_root).unwrap();
        let second = build_mapping(&source_root, &output_root).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_compile_all_writes_artifacts() {
        let dir = tempdir().unwrap();
        let options = BuildOptions {
            source_root: dir.path().join("resources"),
            output_root: dir.path().join("classes"),
            base_dir: dir.path().to_path_buf(),
        };
        write_source(&options.source_root, "com/acme/sass/styles.scss", "body {}");

        let compiler = ScriptedCompiler::new();
        let mut logged = Vec::new();
        let summary = compile_all(&options, &compiler, |source, output| {
            logged.push((source.to_path_buf(), output.to_path_buf()));
        })
        .unwrap();

        assert_eq!(summary.compiled, 1);
        assert_eq!(
            fs::read_to_string(options.output_root.join("com/acme/css/styles.css")).unwrap(),
            "/* compiled */\n"
        );
        // logged paths are base-relative
        assert_eq!(
            logged,
            vec![(
                PathBuf::from("resources/com/acme/sass/styles.scss"),
                PathBuf::from("classes/com/acme/css/styles.css"),
            )]
        );
    }

    #[test]
    fn test_compile_all_aborts_on_first_failure() {
        let dir = tempdir().unwrap();
        let options = BuildOptions {
            source_root: dir.path().join("resources"),
            output_root: dir.path().join("classes"),
            base_dir: dir.path().to_path_buf(),
        };
        write_source(&options.source_root, "p/sass/a.scss", "body {}");
        write_source(&options.source_root, "p/sass/b.scss", "body {}");
        write_source(&options.source_root, "p/sass/c.scss", "body {}");

        let compiler = ScriptedCompiler::failing_on("b.scss");
        let err = compile_all(&options, &compiler, |_, _| {}).unwrap_err();

        // The failing pair is named; the third pair is never attempted.
        assert!(err.to_string().contains("b.scss"));
        let compiled = compiler.compiled.borrow();
        assert_eq!(compiled.len(), 2);
        assert!(compiled[1].ends_with("p/sass/b.scss"));

        // Artifacts before the failure stay on disk; later ones don't exist.
        assert!(options.output_root.join("p/css/a.css").exists());
        assert!(!options.output_root.join("p/css/b.css").exists());
        assert!(!options.output_root.join("p/css/c.css").exists());
    }

    #[test]
    fn test_compile_all_with_no_sources_succeeds() {
        let dir = tempdir().unwrap();
        let options = BuildOptions {
            source_root: dir.path().join("resources"),
            output_root: dir.path().join("classes"),
            base_dir: dir.path().to_path_buf(),
        };

        let compiler = ScriptedCompiler::new();
        let summary = compile_all(&options, &compiler, |_, _| {}).unwrap();

        assert_eq!(summary.compiled, 0);
        assert!(compiler.compiled.borrow().is_empty());
    }

    #[test]
    fn test_display_relative_falls_back_to_full_path() {
        let path = Path::new("/somewhere/else/styles.scss");
        assert_eq!(display_relative(path, Path::new("/base")), path);
        assert_eq!(
            display_relative(Path::new("/base/a/styles.scss"), Path::new("/base")),
            Path::new("a/styles.scss")
        );
    }
}
