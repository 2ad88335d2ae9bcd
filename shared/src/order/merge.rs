//! Order merge selection checks and wire types

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::error::OrderError;
use super::money::format_currency;
use crate::models::{Order, TableSummary};

/// Generic failure text for a rejected merge
pub const MERGE_FAILED_MESSAGE: &str = "Failed to merge orders. Please try again.";

/// How the backend combines the selected orders
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// Move items into an existing order
    #[default]
    Append,
    /// Close all sources and open a fresh order on a table
    CreateNew,
}

impl std::str::FromStr for MergeStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "append" => Ok(Self::Append),
            "create_new" => Ok(Self::CreateNew),
            other => Err(format!("unknown merge strategy: {}", other)),
        }
    }
}

/// Local preconditions checked before asking the backend
///
/// Needs at least two distinct ids, and the restaurant summary must allow
/// merging at all.
pub fn check_merge_selection(order_ids: &[String], summary: &TableSummary) -> Result<(), OrderError> {
    check_distinct(order_ids)?;
    if !summary.can_merge {
        return Err(OrderError::MergeUnavailable);
    }
    Ok(())
}

fn check_distinct(order_ids: &[String]) -> Result<(), OrderError> {
    if order_ids.len() < 2 {
        return Err(OrderError::NotEnoughOrders);
    }
    let mut seen = HashSet::new();
    for id in order_ids {
        if !seen.insert(id.as_str()) {
            return Err(OrderError::DuplicateOrder(id.clone()));
        }
    }
    Ok(())
}

/// `POST /api/v1/orders/merge/validate` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MergeValidateRequest {
    pub order_ids: Vec<String>,
}

/// Preview of the merged order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MergePreview {
    pub total_amount: f64,
    pub item_count: u32,
    pub order_count: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub table_numbers: Vec<String>,
}

/// Backend verdict on a candidate merge
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MergeValidation {
    pub can_merge: bool,
    /// Blocking reasons
    #[serde(default)]
    pub restrictions: Vec<String>,
    /// Non-blocking notices
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<MergePreview>,
}

impl MergeValidation {
    /// Turn a negative verdict into an error carrying the restrictions
    pub fn ensure_mergeable(&self) -> Result<(), OrderError> {
        if self.can_merge {
            return Ok(());
        }
        let reason = if self.restrictions.is_empty() {
            "no reason given".to_string()
        } else {
            self.restrictions.join("; ")
        };
        Err(OrderError::MergeNotAllowed(reason))
    }
}

/// `POST /api/v1/orders/merge` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MergeRequest {
    pub source_order_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_order_id: Option<String>,
    pub strategy: MergeStrategy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
}

impl MergeRequest {
    pub fn append(source_order_ids: Vec<String>, target_order_id: Option<String>) -> Self {
        Self {
            source_order_ids,
            target_order_id,
            strategy: MergeStrategy::Append,
            table_id: None,
        }
    }

    pub fn create_new(source_order_ids: Vec<String>, table_id: impl Into<String>) -> Self {
        Self {
            source_order_ids,
            target_order_id: None,
            strategy: MergeStrategy::CreateNew,
            table_id: Some(table_id.into()),
        }
    }

    pub fn validate(&self) -> Result<(), OrderError> {
        check_distinct(&self.source_order_ids)?;
        match self.strategy {
            MergeStrategy::Append => {
                if let Some(target) = &self.target_order_id
                    && !self.source_order_ids.contains(target)
                {
                    return Err(OrderError::TargetNotSelected(target.clone()));
                }
            }
            MergeStrategy::CreateNew => {
                if self.table_id.as_deref().is_none_or(str::is_empty) {
                    return Err(OrderError::TableRequired);
                }
            }
        }
        Ok(())
    }
}

/// Successful merge response data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub merged_order: Order,
    /// Orders closed by the merge
    #[serde(default)]
    pub closed_order_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
}

impl MergeResult {
    pub fn total(&self) -> f64 {
        self.total_amount
            .unwrap_or_else(|| self.merged_order.effective_total())
    }

    pub fn success_message(&self) -> String {
        merge_success_message(self.total())
    }
}

pub fn merge_success_message(total: f64) -> String {
    format!(
        "Orders merged successfully. New total: {}",
        format_currency(total)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn mergeable() -> TableSummary {
        TableSummary {
            active_orders: 3,
            occupied_tables: 2,
            can_merge: true,
        }
    }

    #[test]
    fn test_selection_needs_two_orders() {
        assert_eq!(
            check_merge_selection(&ids(&["o1"]), &mergeable()),
            Err(OrderError::NotEnoughOrders)
        );
        assert_eq!(
            check_merge_selection(&ids(&["o1", "o1"]), &mergeable()),
            Err(OrderError::DuplicateOrder("o1".into()))
        );
        assert_eq!(check_merge_selection(&ids(&["o1", "o2"]), &mergeable()), Ok(()));
    }

    #[test]
    fn test_selection_respects_summary() {
        let summary = TableSummary {
            active_orders: 1,
            occupied_tables: 1,
            can_merge: false,
        };
        assert_eq!(
            check_merge_selection(&ids(&["o1", "o2"]), &summary),
            Err(OrderError::MergeUnavailable)
        );
    }

    #[test]
    fn test_create_new_requires_table() {
        let mut request = MergeRequest::create_new(ids(&["o1", "o2"]), "t1");
        assert_eq!(request.validate(), Ok(()));
        request.table_id = None;
        assert_eq!(request.validate(), Err(OrderError::TableRequired));
        request.table_id = Some(String::new());
        assert_eq!(request.validate(), Err(OrderError::TableRequired));
    }

    #[test]
    fn test_append_target_must_be_selected() {
        let request = MergeRequest::append(ids(&["o1", "o2"]), Some("o9".into()));
        assert_eq!(
            request.validate(),
            Err(OrderError::TargetNotSelected("o9".into()))
        );
        let request = MergeRequest::append(ids(&["o1", "o2"]), Some("o2".into()));
        assert_eq!(request.validate(), Ok(()));
    }

    #[test]
    fn test_request_body_shape() {
        let request = MergeRequest::create_new(ids(&["o1", "o2"]), "t3");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "sourceOrderIds": ["o1", "o2"],
                "strategy": "create_new",
                "tableId": "t3"
            })
        );
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("append".parse::<MergeStrategy>(), Ok(MergeStrategy::Append));
        assert_eq!(
            "create-new".parse::<MergeStrategy>(),
            Ok(MergeStrategy::CreateNew)
        );
        assert!("zip".parse::<MergeStrategy>().is_err());
    }

    #[test]
    fn test_validation_verdict() {
        let json = r#"{
            "canMerge": false,
            "restrictions": ["Order o2 is paid"],
            "preview": {"totalAmount": 40.5, "itemCount": 4, "orderCount": 2}
        }"#;
        let validation: MergeValidation = serde_json::from_str(json).unwrap();
        assert!(validation.warnings.is_empty());
        assert_eq!(validation.preview.as_ref().unwrap().order_count, 2);
        assert_eq!(
            validation.ensure_mergeable(),
            Err(OrderError::MergeNotAllowed("Order o2 is paid".into()))
        );
    }

    #[test]
    fn test_success_message() {
        let mut merged = Order::new("o1", "1001");
        merged.total_amount = Some(42.5);
        let result = MergeResult {
            merged_order: merged,
            closed_order_ids: vec!["o2".into()],
            total_amount: None,
        };
        assert_eq!(
            result.success_message(),
            "Orders merged successfully. New total: $42.50"
        );
    }
}
