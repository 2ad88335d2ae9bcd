//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification
///
/// Groups codes by the domain they belong to so callers can decide how
/// to surface them (re-login prompt, form error, generic toast).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors
    General,
    /// Authentication errors
    Auth,
    /// Permission errors
    Permission,
    /// Order errors (split, merge, status)
    Order,
    /// Payment errors
    Payment,
    /// Menu and promotion errors
    Menu,
    /// Table errors
    Table,
    /// System errors (network, timeout, internal)
    System,
}

impl ErrorCategory {
    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::Order => "order",
            Self::Payment => "payment",
            Self::Menu => "menu",
            Self::Table => "table",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Success
            | Self::Unknown
            | Self::ValidationError
            | Self::NotFound
            | Self::InvalidRequest
            | Self::ValueOutOfRange => ErrorCategory::General,

            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::RefreshFailed => ErrorCategory::Auth,

            Self::PermissionDenied | Self::TenantNotFound => ErrorCategory::Permission,

            Self::OrderNotFound
            | Self::ItemNotFound
            | Self::InsufficientQuantity
            | Self::InvalidOrderStatus
            | Self::OrderAlreadyPaid
            | Self::OrderEmpty
            | Self::SplitAllItems
            | Self::DuplicateSplitItem
            | Self::InvalidAmount
            | Self::AmountExceedsTotal
            | Self::MergeNotAllowed
            | Self::NotEnoughOrders => ErrorCategory::Order,

            Self::PaymentFailed => ErrorCategory::Payment,

            Self::MenuItemNotFound | Self::PromotionNotFound => ErrorCategory::Menu,

            Self::TableNotFound | Self::TableOccupied | Self::TableRequired => {
                ErrorCategory::Table
            }

            Self::InternalError | Self::NetworkError | Self::TimeoutError | Self::ConfigError => {
                ErrorCategory::System
            }
        }
    }

    /// Whether the session must be re-established after this error
    pub fn requires_login(&self) -> bool {
        matches!(self.category(), ErrorCategory::Auth)
    }
}
