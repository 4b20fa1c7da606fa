//! Error types for the debug archive.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for recorder, archive, and hook operations.
#[derive(Error, Debug)]
pub enum DebugError {
    /// Sink, framer, or compressor failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A lifecycle payload could not be rendered.
    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The archive was already finalized.
    #[error("Debug archive is closed")]
    Closed,

    #[error("Failed to create debug directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create debug archive {}: {source}", path.display())]
    CreateArchive {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid debug configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DebugError {
    /// True for the defined "archive closed" condition.
    pub fn is_closed(&self) -> bool {
        matches!(self, DebugError::Closed)
    }
}
