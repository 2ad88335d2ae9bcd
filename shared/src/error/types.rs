//! Error types and API response structures

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Either built locally or parsed from the `error` object of a backend
/// response. `message` keeps the backend's own text so unmapped codes can
/// still be shown verbatim.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationError, msg)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

/// Error object carried inside a failed [`ApiResponse`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Backend error code (SCREAMING_SNAKE_CASE)
    pub code: ErrorCode,
    /// Backend message
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<ApiErrorBody> for AppError {
    fn from(body: ApiErrorBody) -> Self {
        Self {
            code: body.code,
            message: body.message,
            details: body.details,
        }
    }
}

impl From<&AppError> for ApiErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            code: err.code,
            message: err.message.clone(),
            details: err.details.clone(),
        }
    }
}

/// Unified API response structure
///
/// ```json
/// { "success": true, "data": { ... } }
/// { "success": false, "error": { "code": "ORDER_NOT_FOUND", "message": "..." } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error object (present on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiErrorBody>,
    /// Optional informational message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a success response with data
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Create a failure response from an AppError
    pub fn failure(err: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.into()),
            message: None,
        }
    }

    /// Convert into a `Result`, treating a missing payload on success as an error
    pub fn into_result(self) -> AppResult<T> {
        if !self.success {
            return Err(self
                .error
                .map(AppError::from)
                .unwrap_or_else(|| AppError::new(ErrorCode::Unknown)));
        }
        self.data
            .ok_or_else(|| AppError::internal("Response is missing data"))
    }

    /// Like [`into_result`](Self::into_result), for endpoints that may omit `data`
    pub fn into_optional(self) -> AppResult<Option<T>> {
        if !self.success {
            return Err(self
                .error
                .map(AppError::from)
                .unwrap_or_else(|| AppError::new(ErrorCode::Unknown)));
        }
        Ok(self.data)
    }
}

impl<T> From<AppError> for ApiResponse<T> {
    fn from(err: AppError) -> Self {
        Self::failure(&err)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Order not found");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Missing required fields")
            .with_detail("field", "orderIds")
            .with_detail("reason", "required");

        assert_eq!(err.code, ErrorCode::ValidationError);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "orderIds");
        assert_eq!(details.get("reason").unwrap(), "required");
    }

    #[test]
    fn test_app_error_http_status() {
        assert_eq!(
            AppError::new(ErrorCode::TableNotFound).http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::not_authenticated().http_status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Order 42 not found");
        assert_eq!(format!("{}", err), "Order 42 not found");
    }

    #[test]
    fn test_api_response_success_into_result() {
        let response = ApiResponse::success(42);
        assert!(response.success);
        assert_eq!(response.into_result().unwrap(), 42);
    }

    #[test]
    fn test_api_response_failure_into_result() {
        let json = r#"{"success":false,"error":{"code":"ITEM_NOT_FOUND","message":"Item gone"}}"#;
        let response: ApiResponse<i32> = serde_json::from_str(json).unwrap();
        let err = response.into_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::ItemNotFound);
        assert_eq!(err.message, "Item gone");
    }

    #[test]
    fn test_api_response_failure_without_error_object() {
        let response: ApiResponse<i32> = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert_eq!(response.into_result().unwrap_err().code, ErrorCode::Unknown);
    }

    #[test]
    fn test_api_response_payload_without_default() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Ticket {
            id: String,
        }

        let response: ApiResponse<Ticket> =
            serde_json::from_str(r#"{"success":true,"data":{"id":"t1"}}"#).unwrap();
        assert_eq!(response.into_result().unwrap(), Ticket { id: "t1".into() });

        let response: ApiResponse<Ticket> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(response.into_optional().unwrap(), None);
    }

    #[test]
    fn test_api_response_success_without_data() {
        let response: ApiResponse<i32> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(
            response.into_result().unwrap_err().code,
            ErrorCode::InternalError
        );
    }

    #[test]
    fn test_api_response_optional_data() {
        let response: ApiResponse<i32> = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert_eq!(response.into_optional().unwrap(), None);
    }

    #[test]
    fn test_api_response_serialize() {
        let response = ApiResponse::success("hello");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":\"hello\""));
        assert!(!json.contains("\"error\""));
    }
}
