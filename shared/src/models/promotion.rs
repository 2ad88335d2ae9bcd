//! Promotion quote DTOs

use serde::{Deserialize, Serialize};

/// Promotion kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PromotionType {
    Percentage,
    FixedAmount,
    Bogo,
}

/// Cart line sent for a quote
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub menu_item_id: String,
    pub quantity: u32,
    pub unit_price: f64,
}

/// `POST /api/v1/promotions/calculate` body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromotionQuoteRequest {
    pub items: Vec<CartLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPromotion {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub promotion_type: PromotionType,
    pub discount: f64,
}

/// Quote returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromotionQuote {
    pub subtotal: f64,
    pub discount: f64,
    pub total: f64,
    #[serde(default)]
    pub applied_promotions: Vec<AppliedPromotion>,
}
