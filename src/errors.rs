//! Typed error definitions for fsutils.
//! Provides the small set of failure modes the directory walker can hit, for better logs and tests.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FsUtilError {
    #[error("Path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to allocate memory for {0}")]
    AllocationFailure(PathBuf),

    #[error("Can't open directory {path}: {source}")]
    OpenFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to build path for entry {name:?} under {parent}")]
    PathBuildFailure { parent: PathBuf, name: String },
}

impl FsUtilError {
    /// Stable numeric code, used as a structured log field.
    pub fn code(&self) -> u16 {
        match self {
            FsUtilError::NotADirectory(_) => 10,
            FsUtilError::AllocationFailure(_) => 20,
            FsUtilError::OpenFailure { .. } => 30,
            FsUtilError::PathBuildFailure { .. } => 40,
        }
    }

    /// Short machine-friendly kind, mirrors `code()`.
    pub fn kind(&self) -> &'static str {
        match self {
            FsUtilError::NotADirectory(_) => "not_a_directory",
            FsUtilError::AllocationFailure(_) => "allocation_failure",
            FsUtilError::OpenFailure { .. } => "open_failure",
            FsUtilError::PathBuildFailure { .. } => "path_build_failure",
        }
    }
}
