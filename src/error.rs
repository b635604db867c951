//! Unified error types for tagbridge
//!
//! Error strategy:
//! - `InvalidArgument` is always raised synchronously, before any file I/O,
//!   for both the blocking and the task-based operation forms.
//! - Open-time failures (`PathNotAccessible`, `UnparsableFile`) surface
//!   through the call form's normal outcome channel.
//! - An unsupported container on the binary channel is NOT an error; those
//!   operations resolve to an empty map or a no-op instead.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Top-level error type for tagbridge operations
#[derive(Debug, Error)]
pub enum TagbridgeError {
    /// Malformed caller input, rejected before any file is touched
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The path does not resolve to a readable regular file
    #[error("audio file not found: '{0}'")]
    PathNotAccessible(PathBuf),

    /// The tag library could not recognize or parse the container
    #[error("could not parse file '{path}': {reason}")]
    UnparsableFile { path: PathBuf, reason: String },

    /// A binary-channel payload failed transport decoding or record parsing
    #[error("malformed binary record: {0}")]
    MalformedRecord(String),

    /// The tag library failed to persist changes
    #[error("could not save '{path}': {reason}")]
    SaveFailed { path: PathBuf, reason: String },

    /// A scheduled background task panicked or lost its result channel
    #[error("background task failed: {0}")]
    TaskFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for tagbridge operations
pub type Result<T> = std::result::Result<T, TagbridgeError>;

impl TagbridgeError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        TagbridgeError::InvalidArgument(reason.into())
    }

    pub fn unparsable(path: &Path, reason: impl std::fmt::Display) -> Self {
        TagbridgeError::UnparsableFile {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn malformed_record(reason: impl Into<String>) -> Self {
        TagbridgeError::MalformedRecord(reason.into())
    }

    pub fn save_failed(path: &Path, reason: impl std::fmt::Display) -> Self {
        TagbridgeError::SaveFailed {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
