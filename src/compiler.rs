//! Stylesheet compiler collaborator
//!
//! The pipeline talks to the compiler through the [`StylesheetCompiler`]
//! trait. Production code uses [`GrassCompiler`]; tests substitute mock
//! implementations to script failures.

use std::path::Path;

use crate::error::{SasscadeError, SasscadeResult};

/// Abstract SCSS compiler interface
pub trait StylesheetCompiler {
    /// Compile one source file to CSS text
    ///
    /// The include search path is the source file's containing directory,
    /// so `@use` and `@import` of sibling partials resolve.
    fn compile(&self, source: &Path) -> SasscadeResult<String>;
}

/// Production compiler backed by the `grass` crate
///
/// Output style is fixed to expanded and is not configurable.
#[derive(Debug, Clone, Copy, Default)]
pub struct GrassCompiler;

impl GrassCompiler {
    /// Create a new GrassCompiler instance
    pub fn new() -> Self {
        Self
    }
}

impl StylesheetCompiler for GrassCompiler {
    fn compile(&self, source: &Path) -> SasscadeResult<String> {
        let include_dir = source.parent().unwrap_or_else(|| Path::new("."));
        let options = grass::Options::default()
            .style(grass::OutputStyle::Expanded)
            .load_path(include_dir);

        grass::from_path(source, &options).map_err(|e| SasscadeError::Compile {
            path: source.to_path_buf(),
            message: e.to_string(),
        })
    }
}
