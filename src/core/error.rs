//! Error types for the archive tool
//!
//! This module defines the error taxonomy used throughout the crate.
//! Structural errors on a root path abort an operation; per-file errors
//! during a walk are recorded in the operation's outcome instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the archive tool
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// A path that an operation requires does not exist
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The root path exists but is not a directory
    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// A file exists but could not be opened or read; recoverable, the
    /// walk skips the file and continues
    #[error("Unreadable file '{}': {reason}", .path.display())]
    UnreadableFile { path: PathBuf, reason: String },

    /// Unsupported hash algorithm, empty or unknown grouping field,
    /// empty catalog name
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Collision resolution gave up after the retry bound; signals a
    /// filesystem problem rather than a normal name clash
    #[error("Could not find a free destination name for '{}'", .0.display())]
    MoveConflict(PathBuf),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ArchiveError>;

impl From<std::io::Error> for ArchiveError {
    fn from(err: std::io::Error) -> Self {
        ArchiveError::Io(err.to_string())
    }
}
