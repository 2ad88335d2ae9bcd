//! Error codes reported by the order backend
//!
//! The backend reports failures as SCREAMING_SNAKE_CASE strings
//! (`"ITEM_NOT_FOUND"`). Codes this client does not know deserialize
//! to [`ErrorCode::Unknown`] so the raw backend message can still be shown.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unified error code enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // ==================== General ====================
    /// Operation completed successfully
    Success,
    /// Unknown or unmapped error
    Unknown,
    /// Request payload failed validation
    ValidationError,
    /// Resource not found
    NotFound,
    /// Invalid request
    InvalidRequest,
    /// Value out of range
    ValueOutOfRange,

    // ==================== Auth ====================
    /// User is not authenticated
    NotAuthenticated,
    /// Invalid credentials (username/password)
    InvalidCredentials,
    /// Token has expired
    TokenExpired,
    /// Token is invalid
    TokenInvalid,
    /// Refresh token rejected
    RefreshFailed,

    // ==================== Permission ====================
    /// Permission denied
    PermissionDenied,
    /// Tenant (restaurant) not selected or not accessible
    TenantNotFound,

    // ==================== Order ====================
    /// Order not found
    OrderNotFound,
    /// Order item not found
    ItemNotFound,
    /// Requested quantity exceeds what the item holds
    InsufficientQuantity,
    /// Order status does not allow the operation
    InvalidOrderStatus,
    /// Order has already been paid
    OrderAlreadyPaid,
    /// Order is empty
    OrderEmpty,
    /// Split would leave the source order without items
    SplitAllItems,
    /// Same item listed twice in a split selection
    DuplicateSplitItem,
    /// Split amount is not positive or not finite
    InvalidAmount,
    /// Split amount reaches or exceeds the order total
    AmountExceedsTotal,
    /// Backend refused to merge the selected orders
    MergeNotAllowed,
    /// Fewer than two orders selected for merging
    NotEnoughOrders,

    // ==================== Payment ====================
    /// Payment processing failed
    PaymentFailed,

    // ==================== Menu / Promotion ====================
    /// Menu item not found
    MenuItemNotFound,
    /// Promotion not found or not applicable
    PromotionNotFound,

    // ==================== Table ====================
    /// Table not found
    TableNotFound,
    /// Table is occupied
    TableOccupied,
    /// Table is required for the operation
    TableRequired,

    // ==================== System ====================
    /// Internal server error
    InternalError,
    /// Network error
    NetworkError,
    /// Operation timed out
    TimeoutError,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Wire representation of this code
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Success => "SUCCESS",
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::ValueOutOfRange => "VALUE_OUT_OF_RANGE",
            ErrorCode::NotAuthenticated => "NOT_AUTHENTICATED",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::TokenInvalid => "TOKEN_INVALID",
            ErrorCode::RefreshFailed => "REFRESH_FAILED",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::TenantNotFound => "TENANT_NOT_FOUND",
            ErrorCode::OrderNotFound => "ORDER_NOT_FOUND",
            ErrorCode::ItemNotFound => "ITEM_NOT_FOUND",
            ErrorCode::InsufficientQuantity => "INSUFFICIENT_QUANTITY",
            ErrorCode::InvalidOrderStatus => "INVALID_ORDER_STATUS",
            ErrorCode::OrderAlreadyPaid => "ORDER_ALREADY_PAID",
            ErrorCode::OrderEmpty => "ORDER_EMPTY",
            ErrorCode::SplitAllItems => "SPLIT_ALL_ITEMS",
            ErrorCode::DuplicateSplitItem => "DUPLICATE_SPLIT_ITEM",
            ErrorCode::InvalidAmount => "INVALID_AMOUNT",
            ErrorCode::AmountExceedsTotal => "AMOUNT_EXCEEDS_TOTAL",
            ErrorCode::MergeNotAllowed => "MERGE_NOT_ALLOWED",
            ErrorCode::NotEnoughOrders => "NOT_ENOUGH_ORDERS",
            ErrorCode::PaymentFailed => "PAYMENT_FAILED",
            ErrorCode::MenuItemNotFound => "MENU_ITEM_NOT_FOUND",
            ErrorCode::PromotionNotFound => "PROMOTION_NOT_FOUND",
            ErrorCode::TableNotFound => "TABLE_NOT_FOUND",
            ErrorCode::TableOccupied => "TABLE_OCCUPIED",
            ErrorCode::TableRequired => "TABLE_REQUIRED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::NetworkError => "NETWORK_ERROR",
            ErrorCode::TimeoutError => "TIMEOUT_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
        }
    }

    /// Parse a wire code. Unrecognized codes map to [`ErrorCode::Unknown`].
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" => ErrorCode::Success,
            "VALIDATION_ERROR" => ErrorCode::ValidationError,
            "NOT_FOUND" => ErrorCode::NotFound,
            "INVALID_REQUEST" => ErrorCode::InvalidRequest,
            "VALUE_OUT_OF_RANGE" => ErrorCode::ValueOutOfRange,
            "NOT_AUTHENTICATED" | "UNAUTHORIZED" => ErrorCode::NotAuthenticated,
            "INVALID_CREDENTIALS" => ErrorCode::InvalidCredentials,
            "TOKEN_EXPIRED" => ErrorCode::TokenExpired,
            "TOKEN_INVALID" => ErrorCode::TokenInvalid,
            "REFRESH_FAILED" => ErrorCode::RefreshFailed,
            "PERMISSION_DENIED" | "FORBIDDEN" => ErrorCode::PermissionDenied,
            "TENANT_NOT_FOUND" => ErrorCode::TenantNotFound,
            "ORDER_NOT_FOUND" => ErrorCode::OrderNotFound,
            "ITEM_NOT_FOUND" => ErrorCode::ItemNotFound,
            "INSUFFICIENT_QUANTITY" => ErrorCode::InsufficientQuantity,
            "INVALID_ORDER_STATUS" => ErrorCode::InvalidOrderStatus,
            "ORDER_ALREADY_PAID" => ErrorCode::OrderAlreadyPaid,
            "ORDER_EMPTY" => ErrorCode::OrderEmpty,
            "SPLIT_ALL_ITEMS" => ErrorCode::SplitAllItems,
            "DUPLICATE_SPLIT_ITEM" => ErrorCode::DuplicateSplitItem,
            "INVALID_AMOUNT" => ErrorCode::InvalidAmount,
            "AMOUNT_EXCEEDS_TOTAL" => ErrorCode::AmountExceedsTotal,
            "MERGE_NOT_ALLOWED" => ErrorCode::MergeNotAllowed,
            "NOT_ENOUGH_ORDERS" => ErrorCode::NotEnoughOrders,
            "PAYMENT_FAILED" => ErrorCode::PaymentFailed,
            "MENU_ITEM_NOT_FOUND" => ErrorCode::MenuItemNotFound,
            "PROMOTION_NOT_FOUND" => ErrorCode::PromotionNotFound,
            "TABLE_NOT_FOUND" => ErrorCode::TableNotFound,
            "TABLE_OCCUPIED" => ErrorCode::TableOccupied,
            "TABLE_REQUIRED" => ErrorCode::TableRequired,
            "INTERNAL_ERROR" => ErrorCode::InternalError,
            "NETWORK_ERROR" => ErrorCode::NetworkError,
            "TIMEOUT_ERROR" => ErrorCode::TimeoutError,
            "CONFIG_ERROR" => ErrorCode::ConfigError,
            _ => ErrorCode::Unknown,
        }
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Default message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationError => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::RefreshFailed => "Session could not be refreshed",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::TenantNotFound => "Restaurant not found",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::ItemNotFound => "Order item not found",
            ErrorCode::InsufficientQuantity => "Insufficient quantity",
            ErrorCode::InvalidOrderStatus => "Invalid order status",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::SplitAllItems => {
                "Cannot split all items. At least one item must remain in the original order."
            }
            ErrorCode::DuplicateSplitItem => "Item selected more than once",
            ErrorCode::InvalidAmount => "Amount must be greater than zero",
            ErrorCode::AmountExceedsTotal => "Amount must be less than the order total",
            ErrorCode::MergeNotAllowed => "Selected orders cannot be merged",
            ErrorCode::NotEnoughOrders => "Select at least two orders to merge",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",

            // Menu / Promotion
            ErrorCode::MenuItemNotFound => "Menu item not found",
            ErrorCode::PromotionNotFound => "Promotion not found",

            // Table
            ErrorCode::TableNotFound => "Table not found",
            ErrorCode::TableOccupied => "Table is occupied",
            ErrorCode::TableRequired => "A table must be selected",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::TimeoutError => "Operation timed out",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ErrorCode::from_code(&raw))
    }
}
