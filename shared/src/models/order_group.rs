//! Client-side order grouping for the merge picker

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::order::Order;
use crate::order::money::sum_amounts;

/// Orders clustered for display. Not persisted by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderGroup {
    pub id: String,
    pub name: String,
    pub order_ids: Vec<String>,
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
}

/// Restaurant-wide merge availability
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TableSummary {
    pub active_orders: usize,
    pub occupied_tables: usize,
    /// At least two active orders exist
    pub can_merge: bool,
}

impl TableSummary {
    pub fn from_orders(orders: &[Order]) -> Self {
        let active: Vec<&Order> = orders.iter().filter(|o| o.status.is_active()).collect();
        let mut tables: Vec<&str> = active
            .iter()
            .filter_map(|o| o.table_id.as_deref())
            .collect();
        tables.sort_unstable();
        tables.dedup();

        Self {
            active_orders: active.len(),
            occupied_tables: tables.len(),
            can_merge: active.len() >= 2,
        }
    }
}

/// Group active orders by table. Orders without a table land in a
/// "Takeaway" group. Groups are ordered by table id.
pub fn group_by_table(orders: &[Order]) -> Vec<OrderGroup> {
    let mut buckets: BTreeMap<String, Vec<&Order>> = BTreeMap::new();
    for order in orders.iter().filter(|o| o.status.is_active()) {
        let key = order.table_id.clone().unwrap_or_default();
        buckets.entry(key).or_default().push(order);
    }

    buckets
        .into_iter()
        .map(|(table_id, members)| {
            let total = sum_amounts(members.iter().map(|o| o.effective_total()));
            let name = if table_id.is_empty() {
                "Takeaway".to_string()
            } else {
                let label = members
                    .iter()
                    .find_map(|o| o.table_number.clone())
                    .unwrap_or_else(|| table_id.clone());
                format!("Table {}", label)
            };
            let customer_name = members.iter().find_map(|o| o.customer_name.clone());
            OrderGroup {
                id: if table_id.is_empty() {
                    "takeaway".to_string()
                } else {
                    format!("table-{}", table_id)
                },
                name,
                order_ids: members.iter().map(|o| o.id.clone()).collect(),
                total,
                customer_name,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::OrderStatus;

    fn order(id: &str, table: Option<&str>, total: f64, status: OrderStatus) -> Order {
        let mut o = Order::new(id, id);
        o.table_id = table.map(str::to_string);
        o.total = Some(total);
        o.status = status;
        o
    }

    #[test]
    fn test_summary_requires_two_active_orders() {
        let orders = vec![
            order("o1", Some("t1"), 10.0, OrderStatus::Active),
            order("o2", Some("t2"), 10.0, OrderStatus::Paid),
        ];
        let summary = TableSummary::from_orders(&orders);
        assert_eq!(summary.active_orders, 1);
        assert!(!summary.can_merge);

        let orders = vec![
            order("o1", Some("t1"), 10.0, OrderStatus::Active),
            order("o2", Some("t1"), 10.0, OrderStatus::Active),
        ];
        let summary = TableSummary::from_orders(&orders);
        assert_eq!(summary.active_orders, 2);
        assert_eq!(summary.occupied_tables, 1);
        assert!(summary.can_merge);
    }

    #[test]
    fn test_group_by_table() {
        let mut first = order("o1", Some("t1"), 10.5, OrderStatus::Active);
        first.table_number = Some("7".to_string());
        first.customer_name = Some("Ana".to_string());
        let orders = vec![
            first,
            order("o2", Some("t1"), 4.5, OrderStatus::Active),
            order("o3", None, 8.0, OrderStatus::Active),
            order("o4", Some("t2"), 99.0, OrderStatus::Cancelled),
        ];

        let groups = group_by_table(&orders);
        assert_eq!(groups.len(), 2);

        let takeaway = &groups[0];
        assert_eq!(takeaway.id, "takeaway");
        assert_eq!(takeaway.order_ids, vec!["o3".to_string()]);

        let table = &groups[1];
        assert_eq!(table.name, "Table 7");
        assert_eq!(table.order_ids.len(), 2);
        assert_eq!(table.total, 15.0);
        assert_eq!(table.customer_name.as_deref(), Some("Ana"));
    }
}
