//! Session state and background token refresh

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use shared::client::{LoginResponse, RefreshRequest, RefreshResponse, UserInfo};
use shared::util::now_millis;
use shared::ApiResponse;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::config::RefreshPolicy;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

pub const REFRESH_PATH: &str = "/api/v1/auth/refresh";

/// Authenticated session contents
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionData {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
    /// Access token expiry, unix ms
    pub expires_at: Option<i64>,
    pub user: Option<UserInfo>,
}

/// Shared handle to the current session
///
/// Cloned into the HTTP client and the refresher; all clones see the same
/// token.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<SessionData>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session seeded with an existing access token
    pub fn with_token(token: impl Into<String>) -> Self {
        let token = token.into();
        let data = SessionData {
            expires_at: token_expiry_ms(&token),
            token: Some(token),
            ..SessionData::default()
        };
        Self {
            inner: Arc::new(RwLock::new(data)),
        }
    }

    pub async fn token(&self) -> Option<String> {
        self.inner.read().await.token.clone()
    }

    pub async fn snapshot(&self) -> SessionData {
        self.inner.read().await.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.token.is_some()
    }

    /// Store a fresh login
    pub async fn establish(&self, login: &LoginResponse) {
        let mut data = self.inner.write().await;
        data.expires_at = resolve_expiry(&login.token, login.expires_in, now_millis());
        data.token = Some(login.token.clone());
        data.refresh_token = login.refresh_token.clone();
        data.user = Some(login.user.clone());
        tracing::info!(user_id = %login.user.id, expires_at = ?data.expires_at, "Session established");
    }

    /// Store a refreshed token, keeping the old refresh token when none is returned
    pub async fn apply_refresh(&self, refresh: &RefreshResponse) {
        let mut data = self.inner.write().await;
        data.expires_at = resolve_expiry(&refresh.token, refresh.expires_in, now_millis());
        data.token = Some(refresh.token.clone());
        if let Some(refresh_token) = &refresh.refresh_token {
            data.refresh_token = Some(refresh_token.clone());
        }
    }

    pub async fn set_user(&self, user: UserInfo) {
        self.inner.write().await.user = Some(user);
    }

    pub async fn clear(&self) {
        *self.inner.write().await = SessionData::default();
    }
}

/// `exp` claim of a JWT, in unix ms
///
/// Returns `None` for anything that is not a three-part token with a
/// numeric `exp` in its payload. The signature is not checked.
pub fn token_expiry_ms(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let (_header, payload, _sig) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    Some(exp.saturating_mul(1000))
}

/// Expiry from `expiresIn` seconds, falling back to the JWT claim
fn resolve_expiry(token: &str, expires_in: Option<u64>, now_ms: i64) -> Option<i64> {
    match expires_in {
        Some(secs) => Some(now_ms.saturating_add((secs as i64).saturating_mul(1000))),
        None => token_expiry_ms(token),
    }
}

/// Delay until the refresh should fire
///
/// Normally `margin` before expiry. A token that lives no longer than the
/// margin is refreshed halfway through its remaining lifetime, and never
/// sooner than `floor`.
fn refresh_delay(expires_at: i64, margin: Duration, floor: Duration, now_ms: i64) -> Duration {
    let due = expires_at.saturating_sub(margin.as_millis() as i64);
    if due > now_ms {
        return Duration::from_millis(due.saturating_sub(now_ms) as u64);
    }
    let remaining = expires_at.saturating_sub(now_ms).max(0) as u64;
    Duration::from_millis(remaining / 2).max(floor)
}

/// Background task that keeps the session token fresh
///
/// The task stops on its own when the session has nothing to refresh with,
/// or after retries are exhausted (the session is cleared then). Dropping
/// the handle aborts it.
#[derive(Debug)]
pub struct TokenRefresher {
    handle: JoinHandle<()>,
}

impl TokenRefresher {
    pub fn spawn<C>(client: Arc<C>, session: Session, policy: RefreshPolicy) -> Self
    where
        C: HttpClient + 'static,
    {
        let handle = tokio::spawn(run_refresh_loop(client, session, policy));
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for TokenRefresher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn run_refresh_loop<C: HttpClient>(client: Arc<C>, session: Session, policy: RefreshPolicy) {
    loop {
        let data = session.snapshot().await;
        let (Some(refresh_token), Some(expires_at)) = (data.refresh_token, data.expires_at) else {
            tracing::debug!("No refresh token or expiry, token refresher idle");
            return;
        };

        let delay = refresh_delay(expires_at, policy.margin, policy.retry_delay, now_millis());
        tracing::debug!(delay_ms = delay.as_millis() as u64, "Next token refresh scheduled");
        tokio::time::sleep(delay).await;

        let mut failures = 0u32;
        loop {
            match refresh_once(client.as_ref(), &refresh_token).await {
                Ok(resp) => {
                    session.apply_refresh(&resp).await;
                    tracing::info!("Access token refreshed");
                    break;
                }
                Err(e) => {
                    failures += 1;
                    if failures > policy.max_retries {
                        tracing::error!(error = %e, attempts = failures, "Token refresh failed, clearing session");
                        session.clear().await;
                        return;
                    }
                    tracing::warn!(error = %e, attempt = failures, "Token refresh failed, retrying");
                    tokio::time::sleep(policy.retry_delay).await;
                }
            }
        }
    }
}

async fn refresh_once<C: HttpClient>(client: &C, refresh_token: &str) -> ClientResult<RefreshResponse> {
    let request = RefreshRequest {
        refresh_token: refresh_token.to_string(),
    };
    client
        .post::<ApiResponse<RefreshResponse>, _>(REFRESH_PATH, &request)
        .await?
        .into_result()
        .map_err(ClientError::from)
}
