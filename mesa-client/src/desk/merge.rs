use shared::ApiResponse;
use shared::models::TableSummary;
use shared::order::{
    MERGE_FAILED_MESSAGE, MergeRequest, MergeResult, MergeValidateRequest, MergeValidation,
    check_merge_selection,
};
use std::future::Future;

use super::{DeskFailure, OrderDesk};
use crate::error::{ClientError, ClientResult};
use crate::http::HttpClient;

pub const MERGE_VALIDATE_PATH: &str = "/api/v1/orders/merge/validate";
pub const MERGE_PATH: &str = "/api/v1/orders/merge";

/// Successful merge
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub result: MergeResult,
    /// `Orders merged successfully. New total: $X.XX`
    pub message: String,
}

impl<C: HttpClient> OrderDesk<C> {
    /// Ask the backend whether `order_ids` can be merged
    ///
    /// Fewer than two ids, or a summary that rules merging out, fail
    /// locally without a request.
    pub async fn validate_merge(
        &self,
        order_ids: &[String],
        summary: &TableSummary,
    ) -> ClientResult<MergeValidation> {
        check_merge_selection(order_ids, summary)?;

        let request = MergeValidateRequest {
            order_ids: order_ids.to_vec(),
        };
        let validation = self
            .http
            .post::<ApiResponse<MergeValidation>, _>(MERGE_VALIDATE_PATH, &request)
            .await?
            .into_result()?;

        tracing::debug!(
            orders = order_ids.len(),
            can_merge = validation.can_merge,
            restrictions = validation.restrictions.len(),
            warnings = validation.warnings.len(),
            "Merge validated"
        );
        Ok(validation)
    }

    /// Execute a merge and run `on_refresh` once it succeeds
    ///
    /// Local request problems keep their own message; backend or transport
    /// failures report the generic merge failure text.
    pub async fn execute_merge<F, Fut>(
        &self,
        request: &MergeRequest,
        on_refresh: F,
    ) -> Result<MergeOutcome, DeskFailure>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        if let Err(e) = request.validate() {
            let message = e.to_string();
            return Err(DeskFailure::new(message, ClientError::from(e)));
        }

        let response = self
            .http
            .post::<ApiResponse<MergeResult>, _>(MERGE_PATH, request)
            .await
            .and_then(|resp| resp.into_result().map_err(ClientError::from));

        match response {
            Ok(result) => {
                let message = result.success_message();
                tracing::info!(
                    merged_order_id = %result.merged_order.id,
                    sources = request.source_order_ids.len(),
                    strategy = ?request.strategy,
                    total = result.total(),
                    "Orders merged"
                );
                on_refresh().await;
                Ok(MergeOutcome { result, message })
            }
            Err(err) => {
                tracing::warn!(error = %err, sources = ?request.source_order_ids, "Merge failed");
                Err(DeskFailure::new(MERGE_FAILED_MESSAGE, err))
            }
        }
    }
}
