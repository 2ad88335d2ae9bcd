//! Split-by-amount item allocation
//!
//! Walks the order's items in their original sequence and takes whole
//! lines while they fit under the target. A line that does not fit is
//! taken partially, as many units as still fit, and the walk continues
//! with the next item. The selected amount never exceeds the target.

use rust_decimal::prelude::*;

use super::error::OrderError;
use super::money::{MONEY_TOLERANCE, sum_lines_decimal, to_decimal, to_f64};
use super::split::SplitItem;
use crate::models::{Order, OrderItem};

/// Result of planning a split by amount
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlan {
    pub items: Vec<SplitItem>,
    /// Sum of the selected units
    pub allocated: f64,
    /// Part of the target that could not be covered by whole units
    pub unallocated: f64,
}

/// Greedy, order-preserving allocation of `target` across `items`
///
/// Items with zero quantity or a non-positive unit price are skipped.
/// A non-positive target selects nothing.
pub fn allocate_by_amount(items: &[OrderItem], target: f64) -> Vec<SplitItem> {
    let mut remaining = to_decimal(target);
    let mut picked = Vec::new();

    for item in items {
        if remaining <= Decimal::ZERO {
            break;
        }
        if item.quantity == 0 {
            continue;
        }
        let unit = to_decimal(item.unit_price);
        if unit <= Decimal::ZERO {
            continue;
        }

        let line = unit * Decimal::from(item.quantity);
        let take = if line <= remaining {
            item.quantity
        } else {
            (remaining / unit)
                .floor()
                .to_u32()
                .unwrap_or(0)
                .min(item.quantity)
        };
        if take == 0 {
            continue;
        }

        remaining -= unit * Decimal::from(take);
        picked.push(SplitItem::from_item(item, take));
    }

    picked
}

/// Validate the requested amount against the order, then allocate
pub fn plan_split_by_amount(order: &Order, amount: f64) -> Result<SplitPlan, OrderError> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(OrderError::InvalidAmount(amount));
    }
    let total = order.effective_total();
    if to_decimal(amount) >= to_decimal(total) {
        return Err(OrderError::AmountExceedsTotal { amount, total });
    }

    let items = allocate_by_amount(&order.items, amount);
    let allocated = sum_lines_decimal(items.iter().map(|s| (s.unit_price, s.quantity)));
    let mut unallocated = to_decimal(amount) - allocated;
    if unallocated < MONEY_TOLERANCE {
        unallocated = Decimal::ZERO;
    }

    tracing::debug!(
        order_id = %order.id,
        target = amount,
        allocated = %allocated,
        lines = items.len(),
        "Planned split by amount"
    );

    Ok(SplitPlan {
        items,
        allocated: to_f64(allocated),
        unallocated: to_f64(unallocated),
    })
}
