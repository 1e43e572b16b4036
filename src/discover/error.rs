use std::path::PathBuf;
use thiserror::Error;

use crate::introspect::ProbeError;

//─────────────────────────────────────────────────────────────────────────────

/// Error type for the discovery resolver.
#[derive(Error, Debug)]
pub enum DiscoverError {
    /// Error when the rootpath is missing or not a directory.
    #[error("'{0}' is not a directory")]
    RootNotADirectory(PathBuf),

    /// Error when two options cannot be honored at the same time.
    #[error("Conflicting options: {0}")]
    ConflictingOptions(String),

    /// Error when reading a directory during the walk.
    #[error("Failed to read directory '{0}': {1}")]
    ReadDir(PathBuf, std::io::Error),

    /// Error when a probe fails under the strict failure policy.
    #[error("Introspection failed: {0}")]
    Probe(#[from] ProbeError),
}
