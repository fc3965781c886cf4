//! Platform and backend capabilities the workflow depends on.
//!
//! Each trait stands in for one collaborator owned elsewhere (OS permission
//! prompt, filesystem layout, HTTP transfer, intent dispatch, session store,
//! backend telemetry, dialogs). The `client` crate implements them for real;
//! tests inject fakes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use schoolbook_shared::types::NoteId;

use super::error::{OpenFailure, TelemetryError, TransferFailure};
use super::notice::{Notice, NoticeAction};
use super::types::{AccessPurpose, TransferProgress, TransferReceipt, TransferRequest};

/// Callback receiving transfer progress.
pub type ProgressCallback<'a> = &'a (dyn Fn(TransferProgress) + Send + Sync);

/// Storage permission acquisition.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Request storage access, prompting the user when the platform requires it.
    ///
    /// Returns `false` on denial or if the prompt itself failed.
    async fn request_storage_access(&self, purpose: AccessPurpose) -> bool;
}

/// Platform directory layout.
pub trait PathResolver: Send + Sync {
    /// Directory for transient view copies.
    fn cache_dir(&self) -> PathBuf;

    /// User-visible directory for durable downloads.
    fn downloads_dir(&self) -> PathBuf;

    /// Name of the downloads location shown to the user.
    fn downloads_label(&self) -> String {
        "Downloads".to_string()
    }
}

/// Authenticated file transfer.
#[async_trait]
pub trait TransferClient: Send + Sync {
    /// Stream `request.url` to `request.destination`, reporting progress.
    async fn fetch(
        &self,
        request: &TransferRequest,
        progress: ProgressCallback<'_>,
    ) -> Result<TransferReceipt, TransferFailure>;
}

/// Native view intent and browser fallback.
#[async_trait]
pub trait IntentDispatcher: Send + Sync {
    /// Hand a local file to whichever application handles `mime_type`.
    async fn open_file(&self, path: &Path, mime_type: &str) -> Result<(), OpenFailure>;

    /// Open a URL in the system browser.
    async fn open_url(&self, url: &str) -> Result<(), OpenFailure>;
}

/// Source of the bearer token.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current session token, if signed in.
    async fn auth_token(&self) -> Option<String>;
}

/// Backend usage counters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Record that a note's attachment was viewed.
    async fn record_view(&self, id: &NoteId) -> Result<(), TelemetryError>;

    /// Record that a note's attachment was downloaded.
    async fn record_download(&self, id: &NoteId) -> Result<(), TelemetryError>;
}

/// Dialogs and transient feedback.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Show a blocking notice and wait for the user's choice.
    async fn confirm(&self, notice: Notice) -> NoticeAction;

    /// Show a transient confirmation.
    async fn notify(&self, message: &str);

    /// Report transfer progress. Best effort.
    fn progress(&self, progress: TransferProgress);
}

/// Everything the workflow needs from its environment.
#[derive(Clone)]
pub struct Capabilities {
    /// Storage permission gate.
    pub permissions: Arc<dyn PermissionGate>,
    /// Directory layout.
    pub paths: Arc<dyn PathResolver>,
    /// File transfer.
    pub transfer: Arc<dyn TransferClient>,
    /// Intent dispatch.
    pub intents: Arc<dyn IntentDispatcher>,
    /// Session token.
    pub credentials: Arc<dyn CredentialProvider>,
    /// Telemetry.
    pub telemetry: Arc<dyn TelemetrySink>,
    /// Dialogs.
    pub presenter: Arc<dyn Presenter>,
}
