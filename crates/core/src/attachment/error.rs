//! Attachment retrieval error types.

use std::path::PathBuf;

use schoolbook_shared::types::NoteId;
use thiserror::Error;

use super::types::AccessPurpose;

/// Retrieval workflow errors.
///
/// Every variant is terminal for the current operation; nothing is retried
/// automatically.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The reference carries no remote URL.
    #[error("file URL not available")]
    MissingFile,

    /// The OS denied storage access.
    #[error("storage permission denied for {0}")]
    PermissionDenied(AccessPurpose),

    /// No session token is available to authorize the transfer.
    #[error("no session token available")]
    AuthRequired,

    /// The transfer failed or left no file behind.
    #[error("transfer failed: {0}")]
    Transfer(#[from] TransferFailure),

    /// Neither an installed application nor the browser could open the file.
    #[error("no application can open {mime_type} files")]
    OpenFailed {
        /// MIME type the intent was dispatched with.
        mime_type: String,
    },

    /// Another view or download of the same note is still running.
    #[error("retrieval already in progress for note {0}")]
    AlreadyInProgress(NoteId),

    /// A local directory could not be prepared.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
}

impl RetrievalError {
    /// Create an `Io` variant from a path and an `io::Error`.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an open failed error.
    #[must_use]
    pub fn open_failed(mime_type: impl Into<String>) -> Self {
        Self::OpenFailed {
            mime_type: mime_type.into(),
        }
    }
}

/// Transfer client failures.
#[derive(Debug, Error)]
pub enum TransferFailure {
    /// The request could not be sent or the body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("server responded with HTTP {0}")]
    Status(u16),

    /// Writing the body to disk failed.
    #[error("failed to write '{path}': {source}")]
    Write {
        /// Destination being written.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The transfer reported success but nothing was written.
    #[error("file not found after download: {0}")]
    FileMissing(PathBuf),
}

impl TransferFailure {
    /// Create a request error.
    #[must_use]
    pub fn request(msg: impl Into<String>) -> Self {
        Self::Request(msg.into())
    }

    /// Create a write error.
    #[must_use]
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// A telemetry call failed. Logged, never surfaced.
#[derive(Debug, Error)]
#[error("telemetry call failed: {0}")]
pub struct TelemetryError(pub String);

/// The platform could not open a file or URL.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct OpenFailure(pub String);
