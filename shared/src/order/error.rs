//! Local order validation errors

use thiserror::Error;

use crate::error::{AppError, ErrorCode};

/// Errors raised before a split or merge reaches the backend
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrderError {
    #[error("Amount must be greater than zero, got {0}")]
    InvalidAmount(f64),

    #[error("Amount {amount:.2} must be less than the order total {total:.2}")]
    AmountExceedsTotal { amount: f64, total: f64 },

    #[error("Order {0} is not active")]
    OrderNotActive(String),

    #[error("Select at least one item to split")]
    EmptySelection,

    #[error("Quantity for item {0} must be at least 1")]
    ZeroQuantity(String),

    #[error("Item {0} selected more than once")]
    DuplicateItem(String),

    #[error("Item not found: {0}")]
    ItemNotFound(String),

    #[error("Insufficient quantity for item {item_id}: requested {requested}, available {available}")]
    InsufficientQuantity {
        item_id: String,
        requested: u32,
        available: u32,
    },

    #[error("Cannot split all items. At least one item must remain in the original order.")]
    CannotSplitAllItems,

    #[error("Select at least two orders to merge")]
    NotEnoughOrders,

    #[error("Order {0} selected more than once")]
    DuplicateOrder(String),

    #[error("Merging requires at least two active orders")]
    MergeUnavailable,

    #[error("Target order {0} is not part of the merge selection")]
    TargetNotSelected(String),

    #[error("A table must be selected when creating a new order")]
    TableRequired,

    #[error("Selected orders cannot be merged: {0}")]
    MergeNotAllowed(String),
}

impl OrderError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidAmount(_) => ErrorCode::InvalidAmount,
            Self::AmountExceedsTotal { .. } => ErrorCode::AmountExceedsTotal,
            Self::OrderNotActive(_) => ErrorCode::InvalidOrderStatus,
            Self::EmptySelection | Self::ZeroQuantity(_) => ErrorCode::ValidationError,
            Self::DuplicateItem(_) => ErrorCode::DuplicateSplitItem,
            Self::ItemNotFound(_) => ErrorCode::ItemNotFound,
            Self::InsufficientQuantity { .. } => ErrorCode::InsufficientQuantity,
            Self::CannotSplitAllItems => ErrorCode::SplitAllItems,
            Self::NotEnoughOrders | Self::DuplicateOrder(_) | Self::MergeUnavailable => {
                ErrorCode::NotEnoughOrders
            }
            Self::TargetNotSelected(_) => ErrorCode::InvalidRequest,
            Self::TableRequired => ErrorCode::TableRequired,
            Self::MergeNotAllowed(_) => ErrorCode::MergeNotAllowed,
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        let app = AppError::with_message(err.code(), err.to_string());
        match err {
            OrderError::ItemNotFound(id)
            | OrderError::ZeroQuantity(id)
            | OrderError::DuplicateItem(id) => app.with_detail("itemId", id),
            OrderError::InsufficientQuantity {
                item_id,
                requested,
                available,
            } => app
                .with_detail("itemId", item_id)
                .with_detail("requested", requested)
                .with_detail("available", available),
            OrderError::OrderNotActive(id)
            | OrderError::DuplicateOrder(id)
            | OrderError::TargetNotSelected(id) => app.with_detail("orderId", id),
            _ => app,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_all_message() {
        assert_eq!(
            OrderError::CannotSplitAllItems.to_string(),
            "Cannot split all items. At least one item must remain in the original order."
        );
    }

    #[test]
    fn test_into_app_error_keeps_details() {
        let err: AppError = OrderError::InsufficientQuantity {
            item_id: "it_1".into(),
            requested: 5,
            available: 2,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InsufficientQuantity);
        let details = err.details.unwrap();
        assert_eq!(details.get("itemId").unwrap(), "it_1");
        assert_eq!(details.get("available").unwrap(), 2);
    }

    #[test]
    fn test_amount_message_formatting() {
        let err = OrderError::AmountExceedsTotal {
            amount: 30.0,
            total: 25.5,
        };
        assert_eq!(
            err.to_string(),
            "Amount 30.00 must be less than the order total 25.50"
        );
    }
}
