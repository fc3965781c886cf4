//! Application configuration management.

use std::path::PathBuf;

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Remote API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Local directories used for cached and downloaded files.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Platform behavior (permission model, download notifications).
    #[serde(default)]
    pub platform: PlatformConfig,
    /// Session token source.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the school API, without trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Route prefix for note telemetry (`{base_url}/{notes_route}/{id}/view`).
    #[serde(default = "default_notes_route")]
    pub notes_route: String,
    /// Total timeout for API requests. File transfers have no total limit.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Timeout for establishing a connection.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// Longest a file transfer may wait for the next chunk of the body.
    #[serde(default = "default_read_timeout")]
    pub read_timeout_secs: u64,
    /// Upper bound on a telemetry call before it is abandoned.
    #[serde(default = "default_telemetry_timeout")]
    pub telemetry_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_notes_route() -> String {
    "teacher/notes".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_read_timeout() -> u64 {
    30
}

fn default_telemetry_timeout() -> u64 {
    3000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            notes_route: default_notes_route(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            read_timeout_secs: default_read_timeout(),
            telemetry_timeout_ms: default_telemetry_timeout(),
        }
    }
}

/// Local directory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory name appended to the platform cache/data directories.
    #[serde(default = "default_app_dir_name")]
    pub app_dir_name: String,
    /// Override for the cache directory holding transient view copies.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Override for the user-visible downloads directory.
    #[serde(default)]
    pub downloads_dir: Option<PathBuf>,
}

fn default_app_dir_name() -> String {
    "schoolbook".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            app_dir_name: default_app_dir_name(),
            cache_dir: None,
            downloads_dir: None,
        }
    }
}

/// Storage permission model of the host platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionModel {
    /// Legacy per-app storage permission, requested interactively.
    Legacy,
    /// Unified permission model, storage access is implicitly granted.
    Unified,
    /// Platform without a storage permission gate.
    #[default]
    NotGated,
}

/// Platform behavior configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// How storage permission is acquired.
    #[serde(default)]
    pub permission_model: PermissionModel,
    /// Whether downloads surface a download-manager style notification.
    #[serde(default = "default_notify_downloads")]
    pub notify_downloads: bool,
}

fn default_notify_downloads() -> bool {
    true
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            permission_model: PermissionModel::default(),
            notify_downloads: default_notify_downloads(),
        }
    }
}

/// Session token configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionConfig {
    /// Bearer token that takes precedence over the session file.
    #[serde(default)]
    pub token: Option<String>,
    /// Location of the session file (defaults to the platform data directory).
    #[serde(default)]
    pub session_file: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "schoolbook=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// Sources, later ones overriding earlier ones:
    /// `config/default`, `config/{RUN_MODE}`, then `SCHOOLBOOK__*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("SCHOOLBOOK").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Telemetry timeout as a [`std::time::Duration`].
    #[must_use]
    pub fn telemetry_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.api.telemetry_timeout_ms)
    }
}
