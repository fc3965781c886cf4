//! Attachment retrieval service implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use schoolbook_shared::types::NoteId;
use tracing::{debug, info, warn};

use super::capability::Capabilities;
use super::error::{RetrievalError, TransferFailure};
use super::guard::{InFlightRegistry, PartialFile};
use super::naming;
use super::notice::{Notice, NoticeAction};
use super::types::{
    AccessPurpose, AttachmentRef, DownloadNotification, DownloadOutcome, Retrieved,
    TransferProgress, TransferRequest, ViewOutcome,
};
use crate::notes::Note;

/// Tunables for the retrieval workflow.
#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    /// Upper bound on a telemetry call.
    pub telemetry_timeout: Duration,
    /// Attach a download-manager notification to downloads.
    pub notify_downloads: bool,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            telemetry_timeout: Duration::from_secs(3),
            notify_downloads: true,
        }
    }
}

/// Views and downloads note attachments.
///
/// Both public operations catch every failure at their boundary, show it
/// through the [`Presenter`](super::capability::Presenter) and also return it
/// to the caller.
pub struct AttachmentRetrieval {
    caps: Capabilities,
    settings: RetrievalSettings,
    in_flight: InFlightRegistry,
}

impl AttachmentRetrieval {
    /// Create a new retrieval service.
    #[must_use]
    pub fn new(caps: Capabilities, settings: RetrievalSettings) -> Self {
        Self {
            caps,
            settings,
            in_flight: InFlightRegistry::new(),
        }
    }

    /// Open the attachment in the default handler via a transient local copy.
    ///
    /// When no application can open it, the remote URL is tried in the
    /// browser; when that fails too, the user is offered a download instead.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reference has no URL
    /// - Storage permission is denied
    /// - No session token is available
    /// - The transfer fails or leaves no file
    /// - Neither an application nor the browser can open the file
    /// - A retrieval of the same note is already running
    pub async fn view_file(&self, attachment: &AttachmentRef) -> Result<ViewOutcome, RetrievalError> {
        let result = match self.in_flight.try_acquire(&attachment.id, AccessPurpose::View) {
            Some(_guard) => self.open_for_viewing(attachment).await,
            None => Err(RetrievalError::AlreadyInProgress(attachment.id.clone())),
        };

        match &result {
            Ok(outcome) => {
                info!(note_id = %attachment.id, "Attachment opened");
                self.caps.presenter.notify(&outcome.confirmation()).await;
            }
            Err(err) => {
                warn!(note_id = %attachment.id, error = %err, "View failed");
                let choice = self
                    .caps
                    .presenter
                    .confirm(err.notice(AccessPurpose::View))
                    .await;
                if choice == NoticeAction::Download {
                    // Reported through its own notices
                    let _ = self.download_file(attachment).await;
                }
            }
        }

        result
    }

    /// Save a durable copy to the downloads location.
    ///
    /// Repeated downloads of the same title overwrite the previous copy.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reference has no URL
    /// - Storage permission is denied
    /// - No session token is available
    /// - The transfer fails or leaves no file
    /// - A retrieval of the same note is already running
    pub async fn download_file(
        &self,
        attachment: &AttachmentRef,
    ) -> Result<DownloadOutcome, RetrievalError> {
        let result = match self
            .in_flight
            .try_acquire(&attachment.id, AccessPurpose::Download)
        {
            Some(_guard) => self.save_to_downloads(attachment).await,
            None => Err(RetrievalError::AlreadyInProgress(attachment.id.clone())),
        };

        match &result {
            Ok(outcome) => {
                info!(note_id = %attachment.id, path = %outcome.path.display(), "Attachment downloaded");
                if self.caps.presenter.confirm(outcome.notice()).await == NoticeAction::Open {
                    if let Err(e) = self
                        .caps
                        .intents
                        .open_file(&outcome.path, outcome.mime_type)
                        .await
                    {
                        warn!(path = %outcome.path.display(), error = %e, "Failed to open downloaded file");
                    }
                }
            }
            Err(err) => {
                warn!(note_id = %attachment.id, error = %err, "Download failed");
                self.caps
                    .presenter
                    .confirm(err.notice(AccessPurpose::Download))
                    .await;
            }
        }

        result
    }

    /// Ask the user what to do with a note's attachment and do it.
    ///
    /// Returns `None` when the note has no file or the user cancelled.
    pub async fn select_note(&self, note: &Note) -> Option<Result<Retrieved, RetrievalError>> {
        if !note.has_file() {
            self.caps.presenter.confirm(Notice::no_file()).await;
            return None;
        }

        let attachment = note.attachment();
        match self
            .caps
            .presenter
            .confirm(Notice::choose_action(&note.title))
            .await
        {
            NoticeAction::View => Some(self.view_file(&attachment).await.map(Retrieved::Viewed)),
            NoticeAction::Download => Some(
                self.download_file(&attachment)
                    .await
                    .map(Retrieved::Downloaded),
            ),
            _ => None,
        }
    }

    async fn open_for_viewing(
        &self,
        attachment: &AttachmentRef,
    ) -> Result<ViewOutcome, RetrievalError> {
        ensure_remote_url(attachment)?;
        self.ensure_permission(AccessPurpose::View).await?;
        let token = self.require_token().await?;
        self.record(AccessPurpose::View, &attachment.id).await;

        let file_name = naming::view_file_name(
            &attachment.title,
            &attachment.extension(),
            Utc::now().timestamp_millis(),
        );
        let path = self
            .fetch_into(
                attachment,
                token,
                &self.caps.paths.cache_dir(),
                &file_name,
                None,
                false,
            )
            .await?;

        let mime_type = attachment.mime_type();
        match self.caps.intents.open_file(&path, mime_type).await {
            Ok(()) => Ok(ViewOutcome::OpenedInApp {
                path,
                declared_type: attachment.declared_type,
            }),
            Err(open_err) => {
                warn!(
                    path = %path.display(),
                    mime_type,
                    error = %open_err,
                    "No application opened the file, trying browser"
                );
                match self.caps.intents.open_url(&attachment.remote_url).await {
                    Ok(()) => Ok(ViewOutcome::OpenedInBrowser {
                        url: attachment.remote_url.clone(),
                    }),
                    Err(browser_err) => {
                        warn!(error = %browser_err, "Browser fallback failed");
                        Err(RetrievalError::open_failed(mime_type))
                    }
                }
            }
        }
    }

    async fn save_to_downloads(
        &self,
        attachment: &AttachmentRef,
    ) -> Result<DownloadOutcome, RetrievalError> {
        ensure_remote_url(attachment)?;
        self.ensure_permission(AccessPurpose::Download).await?;
        let token = self.require_token().await?;

        let file_name = naming::download_file_name(&attachment.title, &attachment.extension());
        let notification = self.settings.notify_downloads.then(|| DownloadNotification {
            title: file_name.clone(),
            description: "Downloading file".to_string(),
            mime_type: attachment.mime_type().to_string(),
        });
        let path = self
            .fetch_into(
                attachment,
                token,
                &self.caps.paths.downloads_dir(),
                &file_name,
                notification,
                true,
            )
            .await?;

        self.record(AccessPurpose::Download, &attachment.id).await;

        Ok(DownloadOutcome {
            path,
            location: self.caps.paths.downloads_label(),
            mime_type: attachment.mime_type(),
        })
    }

    /// Transfer into `dir/file_name` through a partial file.
    async fn fetch_into(
        &self,
        attachment: &AttachmentRef,
        bearer_token: String,
        dir: &Path,
        file_name: &str,
        notification: Option<DownloadNotification>,
        report_progress: bool,
    ) -> Result<PathBuf, RetrievalError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| RetrievalError::io(dir, e))?;

        let partial = PartialFile::for_destination(&dir.join(file_name));
        let request = TransferRequest {
            url: attachment.remote_url.clone(),
            bearer_token,
            destination: partial.path().to_path_buf(),
            notification,
        };

        let presenter = Arc::clone(&self.caps.presenter);
        let on_progress = move |progress: TransferProgress| {
            if report_progress {
                presenter.progress(progress);
            }
        };

        let receipt = self.caps.transfer.fetch(&request, &on_progress).await?;
        debug!(
            note_id = %attachment.id,
            bytes = receipt.bytes_written,
            path = %receipt.path.display(),
            "Transfer finished"
        );

        if !file_exists(partial.path()).await {
            return Err(TransferFailure::FileMissing(partial.destination().to_path_buf()).into());
        }
        let path = partial
            .commit()
            .map_err(|e| TransferFailure::write(dir.join(file_name), e))?;
        if !file_exists(&path).await {
            return Err(TransferFailure::FileMissing(path).into());
        }
        Ok(path)
    }

    async fn require_token(&self) -> Result<String, RetrievalError> {
        self.caps
            .credentials
            .auth_token()
            .await
            .ok_or(RetrievalError::AuthRequired)
    }

    async fn ensure_permission(&self, purpose: AccessPurpose) -> Result<(), RetrievalError> {
        if self.caps.permissions.request_storage_access(purpose).await {
            Ok(())
        } else {
            Err(RetrievalError::PermissionDenied(purpose))
        }
    }

    /// Fire-and-forget telemetry: failures and timeouts are only logged.
    async fn record(&self, event: AccessPurpose, id: &NoteId) {
        let telemetry = &self.caps.telemetry;
        let call = async {
            match event {
                AccessPurpose::View => telemetry.record_view(id).await,
                AccessPurpose::Download => telemetry.record_download(id).await,
            }
        };

        match tokio::time::timeout(self.settings.telemetry_timeout, call).await {
            Ok(Ok(())) => debug!(note_id = %id, %event, "Recorded telemetry"),
            Ok(Err(e)) => warn!(note_id = %id, %event, error = %e, "Failed to record telemetry"),
            Err(_) => warn!(note_id = %id, %event, "Telemetry call timed out"),
        }
    }
}

async fn file_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

fn ensure_remote_url(attachment: &AttachmentRef) -> Result<(), RetrievalError> {
    if attachment.has_remote_url() {
        Ok(())
    } else {
        Err(RetrievalError::MissingFile)
    }
}
