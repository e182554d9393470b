//! Wire types for the order REST endpoints.
//!
//! Every request body is sent as JSON in a multipart `payload` field.

use crate::shared::serde_util::string_lenient;
use crate::shared::{Side, WalletAddress};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// `POST /api/register_order`
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisterOrderPayload {
    pub account: WalletAddress,
    pub base_asset: String,
    pub quote_asset: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub quantity: Decimal,
    pub side: Side,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RegisterOrderResponse {
    pub status_code: i64,
    #[serde(default)]
    pub order: Option<OrderAck>,
    #[serde(default)]
    pub message: Option<String>,
    /// Field-level validation errors, shape defined by the backend.
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OrderAck {
    #[serde(rename = "orderId", deserialize_with = "string_lenient::deserialize")]
    pub order_id: String,
    #[serde(default)]
    pub trades: Vec<serde_json::Value>,
}

/// `POST /api/order`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLookupPayload {
    pub order_id: String,
}

/// `POST /api/cancel_order`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderPayload {
    pub order_id: String,
    pub side: Side,
    pub base_asset: String,
    pub quote_asset: String,
}

/// `POST /api/get_best_order`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestOrderPayload {
    pub base_asset: String,
    pub quote_asset: String,
    pub side: Side,
}

/// `POST /api/check_available_funds`
#[derive(Debug, Clone, Serialize)]
pub struct AvailableFundsPayload {
    pub account: WalletAddress,
    pub asset: String,
}
