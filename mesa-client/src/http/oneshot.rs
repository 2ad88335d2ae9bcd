use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use http::{Method, Request, header};
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use super::{HttpClient, decode_response};
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// Oneshot HTTP client (in-process calls)
///
/// Each request is served by `Router::oneshot`, no sockets involved.
///
/// ```ignore
/// let router = Router::new().route("/api/v1/tables", get(list_tables));
/// let client = OneshotHttpClient::new(router, Session::with_token("t"));
/// let tables: ApiResponse<Vec<Table>> = client.get("/api/v1/tables").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OneshotHttpClient {
    router: Router,
    session: Session,
}

impl OneshotHttpClient {
    pub fn new(router: Router, session: Session) -> Self {
        Self { router, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    async fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ClientResult<Request<Body>> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = self.session.token().await {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(body.map(Body::from).unwrap_or_else(Body::empty))
            .map_err(|e| ClientError::Internal(format!("Failed to build request: {}", e)))
    }

    async fn execute<T: DeserializeOwned>(&self, request: Request<Body>) -> ClientResult<T> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ClientError::Internal(format!("Oneshot call failed: {}", e)))?;

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ClientError::Internal(format!("Failed to read body: {}", e)))?;

        decode_response(status, &body)
    }
}

#[async_trait]
impl HttpClient for OneshotHttpClient {
    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.build_request(Method::GET, path, None).await?;
        self.execute(request).await
    }

    async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let bytes = serde_json::to_vec(body)?;
        let request = self.build_request(Method::POST, path, Some(bytes)).await?;
        self.execute(request).await
    }

    async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.build_request(Method::POST, path, None).await?;
        self.execute(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Json;
    use axum::http::HeaderMap;
    use axum::routing::get;

    #[tokio::test]
    async fn test_forwards_bearer_token() {
        let router = Router::new().route(
            "/whoami",
            get(|headers: HeaderMap| async move {
                let auth = headers
                    .get(header::AUTHORIZATION)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                Json(serde_json::json!({ "auth": auth }))
            }),
        );
        let client = OneshotHttpClient::new(router, Session::with_token("abc"));
        let body: serde_json::Value = client.get("/whoami").await.unwrap();
        assert_eq!(body["auth"], "Bearer abc");
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let client = OneshotHttpClient::new(Router::new(), Session::new());
        let err = client.get::<serde_json::Value>("/missing").await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }
}
