//! Client error types

use shared::error::{AppError, ErrorCode};
use shared::order::OrderError;
use thiserror::Error;

use crate::notify::NotifyError;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend rejected the request with a structured error
    #[error("API error {}: {}", .0.code, .0.message)]
    Api(AppError),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rejected locally before reaching the backend
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Notification stream failure
    #[error("Notification error: {0}")]
    Message(#[from] NotifyError),
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        ClientError::Api(err)
    }
}

impl ClientError {
    /// Error code best describing this failure
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Api(err) => err.code,
            Self::Order(err) => err.code(),
            Self::Unauthorized => ErrorCode::NotAuthenticated,
            Self::Forbidden(_) => ErrorCode::PermissionDenied,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::Http(err) if err.is_timeout() => ErrorCode::TimeoutError,
            Self::Http(_) | Self::Message(_) => ErrorCode::NetworkError,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::InvalidResponse(_) | Self::Internal(_) | Self::Serialization(_) => {
                ErrorCode::InternalError
            }
        }
    }

    /// Whether the session should be dropped and the operator sent to login
    pub fn requires_login(&self) -> bool {
        self.code().requires_login()
    }

    /// Text suitable for showing to the operator
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(err) if !err.message.is_empty() => err.message.clone(),
            Self::Api(err) => err.code.message().to_string(),
            Self::Order(err) => err.to_string(),
            Self::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            Self::Forbidden(_) => "You do not have permission to do that.".to_string(),
            Self::NotFound(_) => "The requested record could not be found.".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::Http(err) if err.is_timeout() => {
                "The server took too long to respond. Please try again.".to_string()
            }
            Self::Http(_) | Self::Message(_) => {
                "Unable to reach the server. Check your connection.".to_string()
            }
            Self::Config(msg) => format!("Client is misconfigured: {}", msg),
            Self::InvalidResponse(_) | Self::Internal(_) | Self::Serialization(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_keeps_backend_message() {
        let err = ClientError::from(AppError::with_message(
            ErrorCode::TableNotFound,
            "Table 9 is gone",
        ));
        assert_eq!(err.code(), ErrorCode::TableNotFound);
        assert_eq!(err.user_message(), "Table 9 is gone");
    }

    #[test]
    fn test_order_error_passthrough() {
        let err = ClientError::from(OrderError::CannotSplitAllItems);
        assert_eq!(err.code(), ErrorCode::SplitAllItems);
        assert_eq!(
            err.user_message(),
            "Cannot split all items. At least one item must remain in the original order."
        );
    }

    #[test]
    fn test_unauthorized_requires_login() {
        assert!(ClientError::Unauthorized.requires_login());
        assert!(!ClientError::NotFound("x".into()).requires_login());
    }
}
