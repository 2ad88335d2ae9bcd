//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::money::{line_total, sum_amounts};

/// Order status
///
/// Canonical lifecycle: `active` → `paid` | `cancelled`. Older call sites
/// report a settled order as `closed`; that spelling is accepted on input
/// and always written back as `paid`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Active,
    #[serde(alias = "closed", alias = "CLOSED", alias = "PAID")]
    Paid,
    #[serde(alias = "canceled", alias = "CANCELLED")]
    Cancelled,
}

impl OrderStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::Active)
    }
}

/// Payment status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    PartiallyPaid,
    Refunded,
    Failed,
}

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Online,
    #[serde(other)]
    Other,
}

/// Where the order was placed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OrderSource {
    #[serde(rename = "QR_ORDERING", alias = "QR", alias = "qr_ordering", alias = "qr")]
    QrOrdering,
    #[serde(rename = "WAITER", alias = "waiter")]
    Waiter,
    #[serde(rename = "CASHIER", alias = "cashier", alias = "POS")]
    Cashier,
}

/// Kitchen fulfillment status of a line item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Served,
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    /// Menu item reference
    pub menu_item_id: String,
    /// Menu item name snapshot
    #[serde(alias = "name")]
    pub menu_item_name: String,
    pub quantity: u32,
    /// Price per unit in currency unit
    #[serde(alias = "price")]
    pub unit_price: f64,
    /// Line total as stored by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
}

impl OrderItem {
    /// Line total, computed from unit price and quantity when not stored
    pub fn line_total(&self) -> f64 {
        self.total
            .unwrap_or_else(|| line_total(self.unit_price, self.quantity))
    }
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    /// Table number snapshot for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_amount: Option<f64>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<OrderSource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Minimal active order, used when building orders locally
    pub fn new(id: impl Into<String>, order_number: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            order_number: order_number.into(),
            table_id: None,
            table_number: None,
            items: Vec::new(),
            total: None,
            total_amount: None,
            final_amount: None,
            status: OrderStatus::Active,
            payment_status: None,
            payment_method: None,
            source: None,
            customer_name: None,
            customer_phone: None,
            customer_email: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Sum of line totals
    pub fn items_total(&self) -> f64 {
        sum_amounts(self.items.iter().map(OrderItem::line_total))
    }

    /// The order's total, resolving the redundant wire fields
    ///
    /// Precedence: `finalAmount`, `totalAmount`, `total`, then the item sum.
    pub fn effective_total(&self) -> f64 {
        self.final_amount
            .or(self.total_amount)
            .or(self.total)
            .unwrap_or_else(|| self.items_total())
    }

    /// Total number of units across all items
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn find_item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.id == item_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, price: f64, quantity: u32) -> OrderItem {
        OrderItem {
            id: id.to_string(),
            menu_item_id: format!("menu-{}", id),
            menu_item_name: format!("Dish {}", id),
            quantity,
            unit_price: price,
            total: None,
            notes: None,
            status: ItemStatus::Pending,
        }
    }

    #[test]
    fn test_closed_status_is_read_as_paid() {
        let status: OrderStatus = serde_json::from_str("\"closed\"").unwrap();
        assert_eq!(status, OrderStatus::Paid);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"paid\"");
    }

    #[test]
    fn test_cancelled_spellings() {
        let a: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        let b: OrderStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(a, OrderStatus::Cancelled);
        assert_eq!(b, OrderStatus::Cancelled);
    }

    #[test]
    fn test_order_source_variants() {
        let qr: OrderSource = serde_json::from_str("\"QR\"").unwrap();
        let waiter: OrderSource = serde_json::from_str("\"waiter\"").unwrap();
        assert_eq!(qr, OrderSource::QrOrdering);
        assert_eq!(waiter, OrderSource::Waiter);
        assert_eq!(
            serde_json::to_string(&OrderSource::QrOrdering).unwrap(),
            "\"QR_ORDERING\""
        );
    }

    #[test]
    fn test_unknown_payment_method_is_other() {
        let method: PaymentMethod = serde_json::from_str("\"voucher\"").unwrap();
        assert_eq!(method, PaymentMethod::Other);
    }

    #[test]
    fn test_effective_total_precedence() {
        let mut order = Order::new("o1", "1001");
        order.items = vec![item("a", 10.0, 2), item("b", 5.0, 1)];
        assert_eq!(order.effective_total(), 25.0);

        order.total = Some(24.0);
        assert_eq!(order.effective_total(), 24.0);
        order.total_amount = Some(23.0);
        assert_eq!(order.effective_total(), 23.0);
        order.final_amount = Some(22.0);
        assert_eq!(order.effective_total(), 22.0);
    }

    #[test]
    fn test_items_total_avoids_float_drift() {
        let mut order = Order::new("o1", "1001");
        order.items = vec![item("a", 0.1, 1), item("b", 0.2, 1)];
        assert_eq!(order.items_total(), 0.3);
    }

    #[test]
    fn test_item_count() {
        let mut order = Order::new("o1", "1001");
        order.items = vec![item("a", 10.0, 2), item("b", 5.0, 3)];
        assert_eq!(order.item_count(), 5);
    }

    #[test]
    fn test_order_deserialize_from_backend_shape() {
        let json = r#"{
            "id": "ord_1",
            "orderNumber": "A-17",
            "tableId": "t_4",
            "items": [
                {"id": "it_1", "menuItemId": "m_1", "name": "Ramen", "quantity": 2, "price": 12.5, "status": "preparing"}
            ],
            "totalAmount": 25.0,
            "status": "closed",
            "source": "CASHIER",
            "createdAt": "2024-05-01T12:00:00Z"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.order_number, "A-17");
        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.items[0].menu_item_name, "Ramen");
        assert_eq!(order.items[0].status, ItemStatus::Preparing);
        assert_eq!(order.items[0].line_total(), 25.0);
        assert_eq!(order.effective_total(), 25.0);
        assert!(order.created_at.is_some());
    }
}
