//! Auth, order and table endpoints

use shared::ApiResponse;
use shared::client::{LoginRequest, LoginResponse, UserInfo};
use shared::models::{Order, OrderGroup, OrderStatus, Table, TableSummary, group_by_table};
use std::sync::Arc;

use crate::config::RefreshPolicy;
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;
use crate::session::{Session, TokenRefresher};

pub const LOGIN_PATH: &str = "/api/v1/auth/login";
pub const ME_PATH: &str = "/api/v1/auth/me";
pub const LOGOUT_PATH: &str = "/api/v1/auth/logout";
pub const ORDERS_PATH: &str = "/api/v1/orders";
pub const TABLES_PATH: &str = "/api/v1/tables";

/// Typed access to the backend REST API
#[derive(Debug)]
pub struct MesaApi<C> {
    http: Arc<C>,
    session: Session,
}

impl<C> Clone for MesaApi<C> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            session: self.session.clone(),
        }
    }
}

impl<C: HttpClient> MesaApi<C> {
    pub fn new(http: Arc<C>, session: Session) -> Self {
        Self { http, session }
    }

    pub fn http(&self) -> &Arc<C> {
        &self.http
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // ========== Auth API ==========

    /// Login and store the session
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let login = self
            .http
            .post::<ApiResponse<LoginResponse>, _>(LOGIN_PATH, &request)
            .await?
            .into_result()?;
        self.session.establish(&login).await;
        Ok(login)
    }

    /// Current user, also cached on the session
    pub async fn me(&self) -> ClientResult<UserInfo> {
        let user = self
            .http
            .get::<ApiResponse<UserInfo>>(ME_PATH)
            .await?
            .into_result()?;
        self.session.set_user(user.clone()).await;
        Ok(user)
    }

    /// Logout. The local session is cleared even when the call fails.
    pub async fn logout(&self) -> ClientResult<()> {
        let result = self
            .http
            .post_empty::<ApiResponse<serde_json::Value>>(LOGOUT_PATH)
            .await
            .and_then(|resp| resp.into_optional().map_err(ClientError::from));
        self.session.clear().await;
        if let Err(e) = &result {
            tracing::warn!(error = %e, "Logout request failed, session cleared locally");
        }
        result.map(|_| ())
    }

    /// Spawn the background refresher for this session
    pub fn start_token_refresh(&self, policy: RefreshPolicy) -> TokenRefresher
    where
        C: 'static,
    {
        TokenRefresher::spawn(self.http.clone(), self.session.clone(), policy)
    }

    // ========== Orders API ==========

    pub async fn list_orders(&self, status: Option<OrderStatus>) -> ClientResult<Vec<Order>> {
        let path = match status {
            Some(status) => format!("{}?status={}", ORDERS_PATH, status_param(status)),
            None => ORDERS_PATH.to_string(),
        };
        let orders = self
            .http
            .get::<ApiResponse<Vec<Order>>>(&path)
            .await?
            .into_result()?;
        tracing::debug!(count = orders.len(), ?status, "Fetched orders");
        Ok(orders)
    }

    pub async fn get_order(&self, order_id: &str) -> ClientResult<Order> {
        let order = self
            .http
            .get::<ApiResponse<Order>>(&format!("{}/{}", ORDERS_PATH, order_id))
            .await?
            .into_result()?;
        Ok(order)
    }

    // ========== Tables API ==========

    pub async fn list_tables(&self) -> ClientResult<Vec<Table>> {
        let tables = self
            .http
            .get::<ApiResponse<Vec<Table>>>(TABLES_PATH)
            .await?
            .into_result()?;
        Ok(tables)
    }

    /// Merge availability derived from the active orders
    pub async fn table_summary(&self) -> ClientResult<TableSummary> {
        let orders = self.list_orders(Some(OrderStatus::Active)).await?;
        Ok(TableSummary::from_orders(&orders))
    }

    /// Active orders grouped by table, for picking merge candidates
    pub async fn order_groups(&self) -> ClientResult<Vec<OrderGroup>> {
        let orders = self.list_orders(Some(OrderStatus::Active)).await?;
        Ok(group_by_table(&orders))
    }
}

fn status_param(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Active => "active",
        OrderStatus::Paid => "paid",
        OrderStatus::Cancelled => "cancelled",
    }
}
