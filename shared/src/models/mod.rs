//! Data models
//!
//! Client-side copies of backend-owned entities.

pub mod dining_table;
pub mod order;
pub mod order_group;
pub mod promotion;

pub use dining_table::{Table, TableStatus};
pub use order::{
    ItemStatus, Order, OrderItem, OrderSource, OrderStatus, PaymentMethod, PaymentStatus,
};
pub use order_group::{OrderGroup, TableSummary, group_by_table};
pub use promotion::{
    AppliedPromotion, CartLine, PromotionQuote, PromotionQuoteRequest, PromotionType,
};
