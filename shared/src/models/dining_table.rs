//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table occupancy status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
    Reserved,
    Cleaning,
}

/// Dining table entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub id: String,
    pub number: String,
    pub capacity: u32,
    #[serde(default)]
    pub status: TableStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Order currently seated at this table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_order_id: Option<String>,
}

impl Table {
    /// Whether a new order can be opened here (merge target for `create_new`)
    pub fn accepts_new_order(&self) -> bool {
        matches!(self.status, TableStatus::Available | TableStatus::Occupied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_deserialize() {
        let json = r#"{"id":"t1","number":"12","capacity":4,"status":"occupied","currentOrderId":"o9"}"#;
        let table: Table = serde_json::from_str(json).unwrap();
        assert_eq!(table.status, TableStatus::Occupied);
        assert_eq!(table.current_order_id.as_deref(), Some("o9"));
        assert!(table.location.is_none());
        assert!(table.accepts_new_order());
    }

    #[test]
    fn test_cleaning_table_rejects_orders() {
        let table = Table {
            id: "t2".into(),
            number: "3".into(),
            capacity: 2,
            status: TableStatus::Cleaning,
            location: Some("Patio".into()),
            current_order_id: None,
        };
        assert!(!table.accepts_new_order());
    }
}
