//! Application error types.

use std::fmt;

use crate::feed::FeedError;
use crate::imagery::HttpError;

/// Errors that can occur during application lifecycle.
#[derive(Debug)]
pub enum AppError {
    /// Failed to build the HTTP client.
    HttpClient(HttpError),

    /// The configured feed could not be set up.
    Feed(FeedError),

    /// Configuration error.
    Config(String),

    /// Failed to create the Tokio runtime.
    RuntimeCreation(String),

    /// `start()` was called outside a Tokio runtime.
    NoRuntime,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::HttpClient(e) => write!(f, "Failed to create HTTP client: {}", e),
            AppError::Feed(e) => write!(f, "Failed to set up POI feed: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::RuntimeCreation(msg) => write!(f, "Failed to create Tokio runtime: {}", msg),
            AppError::NoRuntime => write!(f, "No Tokio runtime is running"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::HttpClient(e) => Some(e),
            AppError::Feed(e) => Some(e),
            AppError::Config(_) | AppError::RuntimeCreation(_) | AppError::NoRuntime => None,
        }
    }
}

impl From<HttpError> for AppError {
    fn from(e: HttpError) -> Self {
        AppError::HttpClient(e)
    }
}

impl From<FeedError> for AppError {
    fn from(e: FeedError) -> Self {
        AppError::Feed(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Config("feed.path is not set".to_string());
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("feed.path"));
    }

    #[test]
    fn test_app_error_from_http_error() {
        let app_err: AppError = HttpError::Client("tls".to_string()).into();
        assert!(matches!(app_err, AppError::HttpClient(_)));
        assert!(std::error::Error::source(&app_err).is_some());
    }
}
