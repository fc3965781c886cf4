//! Session token store.
//!
//! The session lives in a small JSON file (`{ "token": ..., "user": ... }`)
//! under the platform data directory. A token configured through
//! `session.token` takes precedence over the file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use schoolbook_core::attachment::CredentialProvider;
use schoolbook_shared::AppConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const SESSION_FILE_NAME: &str = "session.json";

/// Session store errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session file was configured and the platform has no data directory.
    #[error("no data directory available for the session file")]
    NoDataDir,

    /// Reading or writing the session file failed.
    #[error("I/O error at '{path}': {source}")]
    Io {
        /// Session file path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The session file is not valid JSON.
    #[error("corrupt session file '{path}': {source}")]
    Corrupt {
        /// Session file path.
        path: PathBuf,
        /// Parse error.
        source: serde_json::Error,
    },
}

impl SessionError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Contents of the session file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Signed-in user record, kept as returned by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
}

/// File-backed session store.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
    token_override: Option<String>,
}

impl SessionStore {
    /// Create a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, token_override: Option<String>) -> Self {
        Self {
            path: path.into(),
            token_override: token_override.filter(|t| !t.trim().is_empty()),
        }
    }

    /// Create the store described by the configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, SessionError> {
        let path = match &config.session.session_file {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .ok_or(SessionError::NoDataDir)?
                .join(&config.storage.app_dir_name)
                .join(SESSION_FILE_NAME),
        };
        Ok(Self::new(path, config.session.token.clone()))
    }

    /// Session file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the token comes from configuration rather than the file.
    #[must_use]
    pub fn is_overridden(&self) -> bool {
        self.token_override.is_some()
    }

    /// Read the session file. A missing file is an empty session.
    pub async fn load(&self) -> Result<Session, SessionError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Session::default()),
            Err(e) => return Err(SessionError::io(&self.path, e)),
        };
        serde_json::from_slice(&raw).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Store `token`, keeping the saved user record.
    pub async fn save_token(&self, token: &str) -> Result<(), SessionError> {
        let mut session = self.load().await.unwrap_or_else(|e| {
            warn!(error = %e, "Replacing unreadable session file");
            Session::default()
        });
        session.token = Some(token.trim().to_string());
        self.write(&session).await?;
        debug!(path = %self.path.display(), "Session token saved");
        Ok(())
    }

    /// Sign out: remove the session file.
    pub async fn clear(&self) -> Result<(), SessionError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::io(&self.path, e)),
        }
    }

    /// Whether a token is available.
    pub async fn is_logged_in(&self) -> bool {
        self.auth_token().await.is_some()
    }

    async fn write(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| SessionError::io(parent, e))?;
        }
        let json = serde_json::to_vec_pretty(session).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;

        // Readers never observe a truncated session file.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| SessionError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| SessionError::io(&self.path, e))
    }
}

#[async_trait]
impl CredentialProvider for SessionStore {
    async fn auth_token(&self) -> Option<String> {
        if let Some(token) = &self.token_override {
            return Some(token.clone());
        }
        match self.load().await {
            Ok(session) => session.token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }
}
