//! Attachment types and data structures.

use std::fmt;
use std::path::PathBuf;

use schoolbook_shared::types::NoteId;
use serde::{Deserialize, Serialize};

use super::naming;

/// App-assigned category of an attachment.
///
/// Drives MIME type and default extension selection, independent of the
/// actual file content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredType {
    /// PDF document.
    Pdf,
    /// Word document.
    Doc,
    /// Presentation.
    Ppt,
    /// Image.
    Img,
    /// External link.
    Link,
    /// Anything the API sends that is not one of the above.
    #[default]
    #[serde(other)]
    Other,
}

impl DeclaredType {
    /// Convert to the API string value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "doc",
            Self::Ppt => "ppt",
            Self::Img => "img",
            Self::Link => "link",
            Self::Other => "other",
        }
    }

    /// Parse from the API string value. Unknown values map to [`DeclaredType::Other`].
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "pdf" => Self::Pdf,
            "doc" => Self::Doc,
            "ppt" => Self::Ppt,
            "img" => Self::Img,
            "link" => Self::Link,
            _ => Self::Other,
        }
    }

    /// MIME type handed to the native view intent.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Doc => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            Self::Ppt => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Self::Img => "image/*",
            Self::Link | Self::Other => "*/*",
        }
    }

    /// Extension used when the source filename carries none.
    #[must_use]
    pub fn default_extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Doc => "docx",
            Self::Ppt => "pptx",
            Self::Img => "jpg",
            Self::Link | Self::Other => "file",
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// In-memory description of a remote file.
///
/// Built by whoever lists attachments (usually from a [`crate::notes::Note`])
/// and discarded once the retrieval completes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentRef {
    /// Identifier reported to the backend on view/download.
    pub id: NoteId,
    /// Display name, also the base of the local filename.
    pub title: String,
    /// Declared category.
    pub declared_type: DeclaredType,
    /// Original filename, possibly carrying a real extension.
    pub source_file_name: Option<String>,
    /// HTTPS location of the bytes. Requires a bearer token.
    pub remote_url: String,
    /// Human-readable size, display only.
    pub size_hint: Option<String>,
}

impl AttachmentRef {
    /// Create a reference with no source filename or size hint.
    #[must_use]
    pub fn new(
        id: impl Into<NoteId>,
        title: impl Into<String>,
        declared_type: DeclaredType,
        remote_url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            declared_type,
            source_file_name: None,
            remote_url: remote_url.into(),
            size_hint: None,
        }
    }

    /// Set the original filename.
    #[must_use]
    pub fn with_source_file_name(mut self, name: impl Into<String>) -> Self {
        self.source_file_name = Some(name.into());
        self
    }

    /// Whether there is anything to fetch.
    #[must_use]
    pub fn has_remote_url(&self) -> bool {
        !self.remote_url.trim().is_empty()
    }

    /// Extension of the local copy.
    #[must_use]
    pub fn extension(&self) -> String {
        naming::derive_extension(
            self.source_file_name.as_deref().unwrap_or_default(),
            self.declared_type,
        )
    }

    /// MIME type for the view intent.
    #[must_use]
    pub fn mime_type(&self) -> &'static str {
        self.declared_type.mime_type()
    }
}

/// Why storage access is being requested.
///
/// Doubles as the telemetry event kind, since each purpose records exactly
/// one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessPurpose {
    /// Transient copy opened in the default handler.
    View,
    /// Durable copy in the downloads location.
    Download,
}

impl AccessPurpose {
    /// Verb used in user-facing messages.
    #[must_use]
    pub fn verb(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Download => "download",
        }
    }
}

impl fmt::Display for AccessPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// OS download-manager notification shown while a download runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadNotification {
    /// Notification title (the local filename).
    pub title: String,
    /// Notification body.
    pub description: String,
    /// MIME type registered with the download manager.
    pub mime_type: String,
}

/// A single authenticated transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Source URL.
    pub url: String,
    /// Bearer token for the `Authorization` header.
    pub bearer_token: String,
    /// Where the bytes are streamed to.
    pub destination: PathBuf,
    /// Download-manager integration, when the platform supports it.
    pub notification: Option<DownloadNotification>,
}

/// Result of a completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    /// File the bytes were written to.
    pub path: PathBuf,
    /// Number of bytes written.
    pub bytes_written: u64,
}

/// Fractional transfer progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    /// Bytes received so far.
    pub received: u64,
    /// Total bytes, when the server announced a length.
    pub total: Option<u64>,
}

impl TransferProgress {
    /// Whole percentage, if the total is known.
    #[must_use]
    pub fn percent(&self) -> Option<u64> {
        match self.total {
            Some(0) | None => None,
            Some(total) => Some(self.received.min(total) * 100 / total),
        }
    }
}

/// Successful outcome of `view_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutcome {
    /// The local copy was handed to the default application.
    OpenedInApp {
        /// Temporary local copy.
        path: PathBuf,
        /// Declared type, named in the confirmation.
        declared_type: DeclaredType,
    },
    /// No application could open the file; the browser opened the URL instead.
    OpenedInBrowser {
        /// URL handed to the browser.
        url: String,
    },
}

impl ViewOutcome {
    /// Transient confirmation shown after a successful view.
    #[must_use]
    pub fn confirmation(&self) -> String {
        match self {
            Self::OpenedInApp { declared_type, .. } => format!(
                "{} file opened in default app",
                declared_type.as_str().to_uppercase()
            ),
            Self::OpenedInBrowser { .. } => "File opened in your default browser".to_string(),
        }
    }
}

/// Successful outcome of `download_file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Permanent local copy.
    pub path: PathBuf,
    /// User-facing name of the save location ("Downloads", "Documents").
    pub location: String,
    /// MIME type used if the user chooses to open the file.
    pub mime_type: &'static str,
}

/// Result of acting on a selected note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieved {
    /// The user chose to view.
    Viewed(ViewOutcome),
    /// The user chose to download.
    Downloaded(DownloadOutcome),
}
