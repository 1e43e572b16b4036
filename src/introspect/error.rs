use std::path::PathBuf;
use thiserror::Error;

//─────────────────────────────────────────────────────────────────────────────

/// Error type for package introspection operations.
/// Each variant carries the failing location so a probe failure can be
/// reported against the package it belongs to.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Error when reading a package marker file.
    #[error("Failed to read '{0}': {1}")]
    ReadSource(PathBuf, std::io::Error),

    /// Error when parsing a package marker file.
    #[error("Failed to parse '{0}': {1}")]
    ParseSource(PathBuf, rustpython_parser::ParseError),

    /// Error when a dotted name cannot be resolved on the import search path.
    #[error("Module '{0}' not found on the import search path")]
    ModuleNotFound(String),
}
