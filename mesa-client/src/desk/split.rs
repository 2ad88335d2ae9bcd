use shared::ApiResponse;
use shared::models::Order;
use shared::order::{
    OrderError, SplitItem, SplitOrderRequest, SplitOrderResponse, SplitPlan,
    plan_split_by_amount, split_failure_message, validate_split,
};

use super::{DeskFailure, OrderDesk};
use crate::error::ClientError;
use crate::http::HttpClient;

pub fn split_path(order_id: &str) -> String {
    format!("/api/v1/orders/{}/split", order_id)
}

/// Optional split request fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOptions {
    /// Seat the new order at this table
    pub table_id: Option<String>,
    pub notes: Option<String>,
}

/// Authoritative state after a split
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub response: SplitOrderResponse,
    /// Lines that were submitted
    pub selection: Vec<SplitItem>,
}

impl SplitOutcome {
    pub fn new_order(&self) -> &Order {
        &self.response.new_order
    }

    pub fn original_order(&self) -> &Order {
        &self.response.original_order
    }
}

fn failure_text(err: &ClientError) -> String {
    match err {
        ClientError::Api(app) => split_failure_message(app),
        other => other.user_message(),
    }
}

impl<C: HttpClient> OrderDesk<C> {
    /// Move the selected lines of `order` into a new order
    pub async fn split_items(
        &self,
        order: &Order,
        selection: Vec<SplitItem>,
        options: SplitOptions,
    ) -> Result<SplitOutcome, DeskFailure> {
        if let Err(e) = validate_split(order, &selection) {
            tracing::info!(order_id = %order.id, error = %e, "Split rejected locally");
            let err = ClientError::from(e);
            return Err(DeskFailure::new(failure_text(&err), err));
        }

        let mut request = SplitOrderRequest::from_selection(&selection);
        if let Some(table_id) = options.table_id {
            request = request.with_table(table_id);
        }
        if let Some(notes) = options.notes {
            request = request.with_notes(notes);
        }

        let response = self
            .http
            .post::<ApiResponse<SplitOrderResponse>, _>(&split_path(&order.id), &request)
            .await
            .and_then(|resp| resp.into_result().map_err(ClientError::from));

        match response {
            Ok(response) => {
                tracing::info!(
                    order_id = %order.id,
                    new_order_id = %response.new_order.id,
                    lines = selection.len(),
                    "Order split"
                );
                Ok(SplitOutcome {
                    response,
                    selection,
                })
            }
            Err(err) => {
                tracing::warn!(order_id = %order.id, error = %err, "Split failed");
                Err(DeskFailure::new(failure_text(&err), err))
            }
        }
    }

    /// Preview the lines a split by amount would move
    pub fn plan_by_amount(&self, order: &Order, amount: f64) -> Result<SplitPlan, OrderError> {
        plan_split_by_amount(order, amount)
    }

    /// Allocate `amount` over the order's lines and split them off
    pub async fn split_by_amount(
        &self,
        order: &Order,
        amount: f64,
        options: SplitOptions,
    ) -> Result<SplitOutcome, DeskFailure> {
        let plan = match plan_split_by_amount(order, amount) {
            Ok(plan) => plan,
            Err(e) => {
                let err = ClientError::from(e);
                return Err(DeskFailure::new(failure_text(&err), err));
            }
        };
        if plan.unallocated > 0.0 {
            tracing::debug!(
                order_id = %order.id,
                unallocated = plan.unallocated,
                "Amount not fully covered by whole units"
            );
        }
        self.split_items(order, plan.items, options).await
    }
}
