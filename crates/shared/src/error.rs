//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// The API rejected the session token.
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    /// The signed-in user may not access the resource.
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The API rejected the request payload or parameters.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The API or the network failed.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Classifies a non-success HTTP status returned by the API.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            400 | 409 | 422 => Self::Validation(message),
            _ => Self::ExternalService(format!("HTTP {status}: {message}")),
        }
    }

    /// Returns the error code used in logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether signing in again could resolve the error.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(401, "UNAUTHORIZED")]
    #[case(403, "FORBIDDEN")]
    #[case(404, "NOT_FOUND")]
    #[case(400, "VALIDATION_ERROR")]
    #[case(422, "VALIDATION_ERROR")]
    #[case(500, "EXTERNAL_SERVICE_ERROR")]
    #[case(502, "EXTERNAL_SERVICE_ERROR")]
    fn test_from_status(#[case] status: u16, #[case] code: &str) {
        assert_eq!(AppError::from_status(status, "msg").error_code(), code);
    }

    #[test]
    fn test_server_error_keeps_status_in_message() {
        let err = AppError::from_status(503, "unavailable");
        assert_eq!(
            err.to_string(),
            "External service error: HTTP 503: unavailable"
        );
    }

    #[test]
    fn test_auth_failure() {
        assert!(AppError::from_status(401, "expired").is_auth_failure());
        assert!(!AppError::from_status(403, "nope").is_auth_failure());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Unauthorized("msg".into()).to_string(),
            "Authentication failed: msg"
        );
        assert_eq!(
            AppError::Configuration("msg".into()).to_string(),
            "Configuration error: msg"
        );
    }
}
