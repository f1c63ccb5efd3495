//! Domain-specific error types for the tracking pipeline.
//!
//! All fallible operations return `Result<T, TrackError>`. Errors raised
//! inside a tracking cycle are logged by the loop and never escape it.

use std::path::PathBuf;

use thiserror::Error;

/// The canonical error type for tracklead.
#[derive(Debug, Error)]
pub enum TrackError {
    // ── I/O ──────────────────────────────────────────────────────
    /// A file, device or socket reported an error.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    // ── Serialization ────────────────────────────────────────────
    /// Encoding or decoding of a payload failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// A frame announced a payload larger than the codec accepts.
    #[error("frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    /// A frame carried a tag this side does not understand.
    #[error("unknown frame tag: {0}")]
    UnknownTag(u8),

    // ── Movement model ───────────────────────────────────────────
    /// The learned-model artifact could not be loaded.
    #[error("invalid model artifact {path}: {reason}")]
    ModelArtifact { path: PathBuf, reason: String },

    // ── Actuation ────────────────────────────────────────────────
    /// The actuation backend rejected or failed a command.
    #[error("backend error: {0}")]
    Backend(String),

    /// The requested facility does not exist on this platform.
    #[error("unsupported on this platform: {0}")]
    Unsupported(&'static str),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

impl TrackError {
    pub(crate) fn artifact(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        TrackError::ModelArtifact {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for TrackError {
    fn from(s: String) -> Self {
        TrackError::Other(s)
    }
}

impl From<&str> for TrackError {
    fn from(s: &str) -> Self {
        TrackError::Other(s.to_string())
    }
}

impl From<Box<bincode::ErrorKind>> for TrackError {
    fn from(e: Box<bincode::ErrorKind>) -> Self {
        TrackError::Encoding(e.to_string())
    }
}
