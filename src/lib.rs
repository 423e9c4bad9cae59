//! Sasscade - convention-driven SCSS to CSS build tool
//!
//! Sasscade scans a source tree for directories named `sass`, compiles each
//! non-partial `.scss` file inside them, and writes the resulting CSS into
//! a mirrored `css` directory under the output root. Everything is
//! recomputed from the filesystem on every run; there is no cache and no
//! incremental state.

pub mod compiler;
pub mod config;
pub mod error;
pub mod fs;
pub mod mapper;
pub mod pipeline;
pub mod scan;
pub mod watcher;

// Re-exports for convenience
pub use compiler::{GrassCompiler, StylesheetCompiler};
pub use config::{Config, Verbosity};
pub use error::{SasscadeError, SasscadeResult};
pub use mapper::{css_dir_for, css_file_name, css_path_for};
pub use pipeline::{build_mapping, compile_all, BuildOptions, BuildSummary, MappedPair};
pub use scan::{find_sass_dirs, is_compilable, list_sass_files};
pub use watcher::{watch, WatchEvent, WatchOptions};
