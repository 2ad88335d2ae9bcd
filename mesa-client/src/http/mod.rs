//! HTTP client abstraction
//!
//! [`NetworkHttpClient`] talks to a real backend over reqwest;
//! [`OneshotHttpClient`] drives an axum `Router` in-process.

mod network;
mod oneshot;

pub use network::NetworkHttpClient;
pub use oneshot::OneshotHttpClient;

use async_trait::async_trait;
use http::StatusCode;
use serde::de::DeserializeOwned;
use shared::ApiResponse;
use shared::error::AppError;

use crate::error::{ClientError, ClientResult};

/// HTTP client trait
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T>;
    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T>;
}

/// Turn a status and raw body into a typed value or a client error
///
/// Failed responses carrying the `{success:false,error:{..}}` envelope become
/// [`ClientError::Api`]; anything else falls back to status-based errors.
pub(crate) fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> ClientResult<T> {
    if !status.is_success() {
        if let Ok(envelope) = serde_json::from_slice::<ApiResponse<serde_json::Value>>(body)
            && let Some(error) = envelope.error
        {
            return Err(ClientError::Api(AppError::from(error)));
        }
        let text = String::from_utf8_lossy(body).to_string();
        tracing::debug!(status = %status, body = %text, "Non-envelope error response");
        return match status {
            StatusCode::UNAUTHORIZED => Err(ClientError::Unauthorized),
            StatusCode::FORBIDDEN => Err(ClientError::Forbidden(text)),
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(text)),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(ClientError::Validation(text))
            }
            _ => Err(ClientError::Internal(text)),
        };
    }

    serde_json::from_slice(body)
        .map_err(|e| ClientError::InvalidResponse(format!("JSON parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::ErrorCode;

    #[test]
    fn test_envelope_error_becomes_api_error() {
        let body = br#"{"success":false,"error":{"code":"INVALID_ORDER_STATUS","message":"Order is paid"}}"#;
        let err = decode_response::<ApiResponse<i32>>(StatusCode::CONFLICT, body).unwrap_err();
        match err {
            ClientError::Api(app) => {
                assert_eq!(app.code, ErrorCode::InvalidOrderStatus);
                assert_eq!(app.message, "Order is paid");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plain_error_falls_back_to_status() {
        let err = decode_response::<i32>(StatusCode::UNAUTHORIZED, b"nope").unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized));

        let err = decode_response::<i32>(StatusCode::NOT_FOUND, b"<html>").unwrap_err();
        assert!(matches!(err, ClientError::NotFound(text) if text == "<html>"));

        let err = decode_response::<i32>(StatusCode::BAD_GATEWAY, b"").unwrap_err();
        assert!(matches!(err, ClientError::Internal(_)));
    }

    #[test]
    fn test_success_body_parse_failure() {
        let err = decode_response::<i32>(StatusCode::OK, b"not json").unwrap_err();
        assert!(matches!(err, ClientError::InvalidResponse(_)));
    }
}
