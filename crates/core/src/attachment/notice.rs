//! User-facing notices.
//!
//! A notice is a blocking dialog: a title, a message and the actions the user
//! can pick from. Failures carry at most two actions (acknowledge, or the
//! suggested alternative).

use super::error::RetrievalError;
use super::types::{AccessPurpose, DownloadOutcome};

/// A choice offered by a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeAction {
    /// Dismiss.
    Acknowledge,
    /// Dismiss without doing anything.
    Cancel,
    /// View the attachment.
    View,
    /// Download the attachment.
    Download,
    /// Open a downloaded file.
    Open,
}

impl NoticeAction {
    /// Button label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Acknowledge => "OK",
            Self::Cancel => "Cancel",
            Self::View => "View",
            Self::Download => "Download",
            Self::Open => "Open",
        }
    }
}

/// A blocking dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Dialog title.
    pub title: String,
    /// Dialog body.
    pub message: String,
    /// Available actions, in display order.
    pub actions: Vec<NoticeAction>,
}

impl Notice {
    /// A plain alert with a single acknowledge action.
    #[must_use]
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            actions: vec![NoticeAction::Acknowledge],
        }
    }

    /// A dialog offering `action` or cancel.
    #[must_use]
    pub fn offer(title: impl Into<String>, message: impl Into<String>, action: NoticeAction) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            actions: vec![NoticeAction::Cancel, action],
        }
    }

    /// Whether the user can pick `action`.
    #[must_use]
    pub fn offers(&self, action: NoticeAction) -> bool {
        self.actions.contains(&action)
    }

    /// Notice for a note without an attached file.
    #[must_use]
    pub fn no_file() -> Self {
        Self::alert("No File", "This note does not have an attached file")
    }

    /// Action sheet for a note with a file.
    #[must_use]
    pub fn choose_action(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: "Choose an action".to_string(),
            actions: vec![NoticeAction::Cancel, NoticeAction::View, NoticeAction::Download],
        }
    }
}

impl DownloadOutcome {
    /// Completion dialog with an optional "Open" action.
    #[must_use]
    pub fn notice(&self) -> Notice {
        Notice {
            title: "Download Complete".to_string(),
            message: format!("File saved to: {}", self.location),
            actions: vec![NoticeAction::Acknowledge, NoticeAction::Open],
        }
    }
}

impl RetrievalError {
    /// Dialog shown when the operation for `purpose` failed with this error.
    #[must_use]
    pub fn notice(&self, purpose: AccessPurpose) -> Notice {
        match self {
            Self::MissingFile => Notice::alert("Error", "File URL not available"),
            Self::PermissionDenied(denied) => Notice::alert(
                "Permission Denied",
                format!("Storage permission is required to {} files", denied.verb()),
            ),
            Self::AuthRequired => Notice::alert(
                "Sign-in Required",
                "Your session has expired. Please sign in again to access this file",
            ),
            Self::AlreadyInProgress(_) => {
                Notice::alert("Please Wait", "This file is already being processed")
            }
            Self::OpenFailed { .. } => Notice::offer(
                "Cannot Open File",
                "No app found to open this file type. Would you like to download it instead?",
                NoticeAction::Download,
            ),
            Self::Transfer(_) | Self::Io { .. } => match purpose {
                AccessPurpose::View => Notice::offer(
                    "Error",
                    format!("{self}. Would you like to download it instead?"),
                    NoticeAction::Download,
                ),
                AccessPurpose::Download => Notice::alert("Error", "Failed to download file"),
            },
        }
    }
}
