//! Order split selection, validation and wire types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::OrderError;
use super::money::{line_total, sum_lines};
use crate::error::{AppError, ErrorCode};
use crate::models::{Order, OrderItem};

/// One line of a split selection
#[derive(Debug, Clone, PartialEq)]
pub struct SplitItem {
    pub item_id: String,
    /// Units moved to the new order
    pub quantity: u32,
    /// Unit price snapshot of the source item
    pub unit_price: f64,
    pub name: String,
}

impl SplitItem {
    pub fn new(item_id: impl Into<String>, quantity: u32) -> Self {
        Self {
            item_id: item_id.into(),
            quantity,
            unit_price: 0.0,
            name: String::new(),
        }
    }

    pub fn from_item(item: &OrderItem, quantity: u32) -> Self {
        Self {
            item_id: item.id.clone(),
            quantity,
            unit_price: item.unit_price,
            name: item.menu_item_name.clone(),
        }
    }

    pub fn amount(&self) -> f64 {
        line_total(self.unit_price, self.quantity)
    }
}

/// Sum of a selection
pub fn selection_total(selection: &[SplitItem]) -> f64 {
    sum_lines(selection.iter().map(|s| (s.unit_price, s.quantity)))
}

/// Check a selection against the order before submitting it
///
/// Rejects empty selections, zero quantities, repeated or unknown items,
/// quantities above what the order holds, and any selection that would
/// leave the original order without items.
pub fn validate_split(order: &Order, selection: &[SplitItem]) -> Result<(), OrderError> {
    if !order.status.is_active() {
        return Err(OrderError::OrderNotActive(order.id.clone()));
    }
    if selection.is_empty() {
        return Err(OrderError::EmptySelection);
    }

    let mut seen = HashSet::new();
    for selected in selection {
        if !seen.insert(selected.item_id.as_str()) {
            return Err(OrderError::DuplicateItem(selected.item_id.clone()));
        }
        if selected.quantity == 0 {
            return Err(OrderError::ZeroQuantity(selected.item_id.clone()));
        }
        let source = order
            .find_item(&selected.item_id)
            .ok_or_else(|| OrderError::ItemNotFound(selected.item_id.clone()))?;
        if selected.quantity > source.quantity {
            return Err(OrderError::InsufficientQuantity {
                item_id: selected.item_id.clone(),
                requested: selected.quantity,
                available: source.quantity,
            });
        }
    }

    if consumes_whole_order(order, selection) {
        return Err(OrderError::CannotSplitAllItems);
    }
    Ok(())
}

// Selection is known to be duplicate-free and within bounds here, so an
// equal line count means every line is covered.
fn consumes_whole_order(order: &Order, selection: &[SplitItem]) -> bool {
    let remaining_lines = order.items.iter().filter(|i| i.quantity > 0).count();
    if selection.len() != remaining_lines {
        return false;
    }
    selection.iter().all(|selected| {
        order
            .find_item(&selected.item_id)
            .is_some_and(|source| selected.quantity == source.quantity)
    })
}

/// Text shown to the operator when the backend rejects a split
///
/// Known codes get a fixed message; anything else falls back to the
/// backend's own message.
pub fn split_failure_message(err: &AppError) -> String {
    let fixed = match err.code {
        ErrorCode::ValidationError => "Invalid split request. Please check the selected items.",
        ErrorCode::ItemNotFound => "One or more selected items no longer exist in this order.",
        ErrorCode::InsufficientQuantity => {
            "Insufficient quantity available for one or more items."
        }
        ErrorCode::InvalidOrderStatus => "This order can no longer be split.",
        ErrorCode::TableNotFound => "The selected table could not be found.",
        ErrorCode::OrderNotFound => "The order could not be found. It may have been closed.",
        ErrorCode::SplitAllItems => {
            "Cannot split all items. At least one item must remain in the original order."
        }
        _ if err.message.is_empty() => "Failed to split order. Please try again.",
        _ => return err.message.clone(),
    };
    fixed.to_string()
}

/// Line of a split request body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SplitRequestLine {
    pub item_id: String,
    pub quantity: u32,
}

/// `POST /api/v1/orders/{id}/split` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitOrderRequest {
    pub items: Vec<SplitRequestLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SplitOrderRequest {
    pub fn from_selection(selection: &[SplitItem]) -> Self {
        Self {
            items: selection
                .iter()
                .map(|s| SplitRequestLine {
                    item_id: s.item_id.clone(),
                    quantity: s.quantity,
                })
                .collect(),
            table_id: None,
            notes: None,
        }
    }

    pub fn with_table(mut self, table_id: impl Into<String>) -> Self {
        self.table_id = Some(table_id.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Summary of what moved, as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SplitDetails {
    #[serde(default)]
    pub moved_items: Vec<SplitRequestLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_order_total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_order_total: Option<f64>,
}

/// Successful split response data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitOrderResponse {
    pub new_order: Order,
    #[serde(alias = "updatedOrder")]
    pub original_order: Order,
    #[serde(default)]
    pub split_details: SplitDetails,
}
