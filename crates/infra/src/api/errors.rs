//! API-specific error types
//!
//! Classifies failures of the CRM API so callers can tell a transient outage
//! from a rejected request, then folds them into [`CrmError`] at the port
//! boundary.

use std::time::Duration;

use dealflow_domain::CrmError;
use thiserror::Error;

/// Categories of API errors for retry logic
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Missing, expired or rejected credentials (401, 403)
    Authentication,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except auth) - non-retryable
    Client,
    /// Network/connection errors
    Network,
    /// Configuration errors - non-retryable
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) | Self::Decode(_) => ApiErrorCategory::Server,
            Self::NotFound(_) | Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Whether repeating the same read could plausibly succeed.
    ///
    /// Authentication failures are not retryable here: the session token is
    /// static, so a second attempt would carry the same credentials.
    pub fn should_retry(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }
}

impl From<ApiError> for CrmError {
    fn from(err: ApiError) -> Self {
        let message = err.to_string();
        match err {
            ApiError::Auth(_) => CrmError::Auth(message),
            ApiError::Network(_) | ApiError::Timeout(_) => CrmError::Network(message),
            ApiError::NotFound(_) => CrmError::NotFound(message),
            ApiError::Client(_) => CrmError::InvalidInput(message),
            ApiError::RateLimit(_) | ApiError::Server(_) | ApiError::Decode(_) => {
                CrmError::Remote(message)
            }
            ApiError::Config(_) => CrmError::Config(message),
        }
    }
}

impl From<CrmError> for ApiError {
    fn from(err: CrmError) -> Self {
        match err {
            CrmError::Network(message) => Self::Network(message),
            CrmError::Auth(message) => Self::Auth(message),
            CrmError::Config(message) => Self::Config(message),
            CrmError::NotFound(message) => Self::NotFound(message),
            CrmError::InvalidInput(message) => Self::Client(message),
            CrmError::Remote(message) | CrmError::Internal(message) => Self::Server(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::Auth("test".to_string()).category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(ApiError::RateLimit("test".to_string()).category(), ApiErrorCategory::RateLimit);
        assert_eq!(ApiError::NotFound("deal".to_string()).category(), ApiErrorCategory::Client);
        assert_eq!(
            ApiError::Timeout(Duration::from_secs(1)).category(),
            ApiErrorCategory::Network
        );
    }

    #[test]
    fn test_should_retry() {
        assert!(ApiError::RateLimit("test".to_string()).should_retry());
        assert!(ApiError::Server("test".to_string()).should_retry());
        assert!(ApiError::Network("test".to_string()).should_retry());
        assert!(!ApiError::Auth("test".to_string()).should_retry());
        assert!(!ApiError::Client("test".to_string()).should_retry());
        assert!(!ApiError::Config("test".to_string()).should_retry());
    }

    #[test]
    fn test_domain_mapping() {
        assert!(matches!(CrmError::from(ApiError::Auth("401".into())), CrmError::Auth(_)));
        assert!(matches!(CrmError::from(ApiError::NotFound("x".into())), CrmError::NotFound(_)));
        assert!(matches!(CrmError::from(ApiError::Server("500".into())), CrmError::Remote(_)));
        assert!(matches!(
            CrmError::from(ApiError::Timeout(Duration::from_secs(3))),
            CrmError::Network(_)
        ));
    }
}
