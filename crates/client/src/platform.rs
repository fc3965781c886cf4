//! Desktop platform capabilities.
//!
//! - [`DesktopPaths`] resolves cache and downloads directories with `dirs`.
//! - [`StoragePermissionGate`] applies the configured permission model.
//! - [`DesktopIntents`] hands files and URLs to the OS with `open`.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use schoolbook_core::attachment::{
    AccessPurpose, IntentDispatcher, OpenFailure, PathResolver, PermissionGate,
};
use schoolbook_shared::PermissionModel;
use schoolbook_shared::config::StorageConfig;
use tracing::{debug, info, warn};

const CACHE_SUBDIR: &str = "attachments";

/// Cache and downloads directories of the current user.
#[derive(Debug, Clone)]
pub struct DesktopPaths {
    cache: PathBuf,
    downloads: PathBuf,
    downloads_label: String,
}

impl DesktopPaths {
    /// Explicit directories.
    #[must_use]
    pub fn new(cache: impl Into<PathBuf>, downloads: impl Into<PathBuf>) -> Self {
        let downloads = downloads.into();
        let downloads_label = label_for(&downloads);
        Self {
            cache: cache.into(),
            downloads,
            downloads_label,
        }
    }

    /// Resolve directories from configuration, falling back to the platform
    /// defaults.
    ///
    /// Downloads go to the user's Downloads folder, or Documents where the
    /// platform has none.
    #[must_use]
    pub fn from_config(storage: &StorageConfig) -> Self {
        let cache = storage.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(&storage.app_dir_name)
                .join(CACHE_SUBDIR)
        });
        let downloads = storage
            .downloads_dir
            .clone()
            .or_else(dirs::download_dir)
            .or_else(dirs::document_dir)
            .unwrap_or_else(|| std::env::temp_dir().join(&storage.app_dir_name));
        Self::new(cache, downloads)
    }

    /// Remove cached view copies. Returns the number of files removed.
    pub fn clear_cache(&self) -> std::io::Result<usize> {
        let entries = match std::fs::read_dir(&self.cache) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e),
        };

        let mut removed = 0;
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                std::fs::remove_file(entry.path())?;
                removed += 1;
            }
        }
        info!(path = %self.cache.display(), removed, "Cleared attachment cache");
        Ok(removed)
    }
}

fn label_for(dir: &Path) -> String {
    dir.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or("Downloads")
        .to_string()
}

impl PathResolver for DesktopPaths {
    fn cache_dir(&self) -> PathBuf {
        self.cache.clone()
    }

    fn downloads_dir(&self) -> PathBuf {
        self.downloads.clone()
    }

    fn downloads_label(&self) -> String {
        self.downloads_label.clone()
    }
}

/// Interactive storage permission prompt.
pub type StoragePrompt = Arc<dyn Fn(AccessPurpose) -> bool + Send + Sync>;

/// Grants storage access according to the platform permission model.
///
/// Only the legacy model asks the user; the unified and non-gated models
/// grant access without a prompt.
#[derive(Clone)]
pub struct StoragePermissionGate {
    model: PermissionModel,
    prompt: StoragePrompt,
}

impl StoragePermissionGate {
    /// Gate for `model` with the terminal confirmation prompt.
    #[must_use]
    pub fn new(model: PermissionModel) -> Self {
        Self::with_prompt(model, Arc::new(terminal_prompt))
    }

    /// Gate for `model` with a custom prompt.
    #[must_use]
    pub fn with_prompt(model: PermissionModel, prompt: StoragePrompt) -> Self {
        Self { model, prompt }
    }
}

fn terminal_prompt(purpose: AccessPurpose) -> bool {
    dialoguer::Confirm::new()
        .with_prompt(format!(
            "Storage Permission: allow access to storage to {} files?",
            purpose.verb()
        ))
        .default(false)
        .interact()
        .unwrap_or_else(|e| {
            warn!(error = %e, "Permission prompt failed");
            false
        })
}

#[async_trait]
impl PermissionGate for StoragePermissionGate {
    async fn request_storage_access(&self, purpose: AccessPurpose) -> bool {
        match self.model {
            PermissionModel::Unified | PermissionModel::NotGated => true,
            PermissionModel::Legacy => {
                let prompt = Arc::clone(&self.prompt);
                let granted = tokio::task::spawn_blocking(move || prompt(purpose))
                    .await
                    .unwrap_or_else(|e| {
                        warn!(error = %e, "Permission prompt task failed");
                        false
                    });
                debug!(%purpose, granted, "Storage permission requested");
                granted
            }
        }
    }
}

/// Opens files and URLs with the desktop's default handlers.
///
/// The desktop picks the handler from the file extension; the MIME type
/// passed to [`IntentDispatcher::open_file`] is only logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopIntents;

/// Hand `target` to the desktop launcher and wait for it to exit.
///
/// A launcher that exits non-zero means nothing could handle the target.
fn open_with_default(target: &OsStr) -> Result<(), OpenFailure> {
    open::that(target).map_err(|e| OpenFailure(e.to_string()))
}

async fn launch(target: OsString) -> Result<(), OpenFailure> {
    tokio::task::spawn_blocking(move || open_with_default(&target))
        .await
        .map_err(|e| OpenFailure(format!("launcher task failed: {e}")))?
}

#[async_trait]
impl IntentDispatcher for DesktopIntents {
    async fn open_file(&self, path: &Path, mime_type: &str) -> Result<(), OpenFailure> {
        if !path.is_file() {
            return Err(OpenFailure(format!("{} does not exist", path.display())));
        }
        debug!(path = %path.display(), mime_type, "Opening file");
        launch(path.as_os_str().to_owned()).await
    }

    async fn open_url(&self, url: &str) -> Result<(), OpenFailure> {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(OpenFailure(format!("refusing to open non-web URL: {url}")));
        }
        debug!(url, "Opening in browser");
        launch(OsString::from(url)).await
    }
}
