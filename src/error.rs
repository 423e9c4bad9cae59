//! Error types for Sasscade
//!
//! Uses `thiserror` for library errors. Every error is fatal: the design is
//! fail-fast with a clear diagnostic, leaving fix-and-rerun to the operator.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Sasscade operations
pub type SasscadeResult<T> = Result<T, SasscadeError>;

/// Main error type for Sasscade operations
#[derive(Error, Debug)]
pub enum SasscadeError {
    /// Source tree walk or directory listing failed
    #[error("failed to scan {path}: {source}")]
    Scan {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A sass directory falls outside the configured source root
    #[error("path '{path}' is not under source root '{root}'")]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },

    /// Two source files map to the same output artifact
    #[error("both '{first}' and '{second}' map to output '{output}'")]
    DuplicateOutput {
        output: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    /// The stylesheet compiler rejected a source file
    #[error("failed to compile {path}: {message}")]
    Compile { path: PathBuf, message: String },

    /// Invalid configuration TOML
    #[error("invalid config in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
