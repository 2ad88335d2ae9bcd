use serde::{Deserialize, Serialize};
use std::fmt;

/// Handshake payload (client -> notification server)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakePayload {
    pub version: u16,
    pub client_name: Option<String>,
    pub client_version: Option<String>,
    /// Session access token, when the server requires one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Order reference carried by order events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotice {
    pub order_id: String,
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
}

/// Print job request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintNotice {
    pub order_id: String,
    pub order_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub printer: Option<String>,
}

/// Desk notification (server -> client)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeskEvent {
    NewOrder(OrderNotice),
    OrderUpdated(OrderNotice),
    PrintRequested(PrintNotice),
}

impl DeskEvent {
    pub fn order_id(&self) -> &str {
        match self {
            Self::NewOrder(n) | Self::OrderUpdated(n) => &n.order_id,
            Self::PrintRequested(p) => &p.order_id,
        }
    }
}

impl fmt::Display for DeskEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewOrder(n) => write!(f, "new order #{}", n.order_number),
            Self::OrderUpdated(n) => write!(f, "order #{} updated", n.order_number),
            Self::PrintRequested(p) => match &p.printer {
                Some(printer) => write!(f, "print order #{} on {}", p.order_number, printer),
                None => write!(f, "print order #{}", p.order_number),
            },
        }
    }
}

/// Generic response payload (server -> client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl ResponsePayload {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            error_code: None,
        }
    }

    pub fn error(message: impl Into<String>, code: Option<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error_code: code,
        }
    }
}
