//! Shared `reqwest` client construction.

use std::time::Duration;

use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use schoolbook_shared::AppError;
use schoolbook_shared::config::ApiConfig;

/// Build the HTTP client used for JSON API calls.
///
/// Each request is bounded by `request_timeout_secs`. Responses are never
/// served from a cache: each request carries `Cache-Control: no-cache` and
/// `Pragma: no-cache`.
pub fn build_http_client(config: &ApiConfig) -> Result<reqwest::Client, AppError> {
    base_builder(config)
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .map_err(|e| AppError::Internal(format!("failed to build HTTP client: {e}")))
}

/// Build the HTTP client used for file transfers.
///
/// A transfer runs until the body ends or the connection stalls: there is no
/// total limit, only `read_timeout_secs` between chunks.
pub fn build_transfer_client(config: &ApiConfig) -> Result<reqwest::Client, AppError> {
    base_builder(config)
        .read_timeout(Duration::from_secs(config.read_timeout_secs))
        .build()
        .map_err(|e| AppError::Internal(format!("failed to build transfer client: {e}")))
}

fn base_builder(config: &ApiConfig) -> reqwest::ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .user_agent(concat!("schoolbook/", env!("CARGO_PKG_VERSION")))
}
