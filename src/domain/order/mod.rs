//! Order domain — order requests, validation, pending orders and receipts.

#[cfg(feature = "http")]
pub mod client;
mod convert;
pub mod wire;

use crate::shared::{parse_decimal, parse_token_address, Side};
use crate::wallet::Account;
use alloy_primitives::Address;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── OrderRequest ────────────────────────────────────────────────────────────

/// A validated limit order: positive price and quantity, two distinct assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub base_asset: Address,
    pub quote_asset: Address,
    pub price: Decimal,
    pub quantity: Decimal,
    pub side: Side,
}

/// The token an order spends and how much of it, in display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpend {
    pub token: Address,
    pub amount: Decimal,
}

impl OrderRequest {
    pub fn new(
        base_asset: Address,
        quote_asset: Address,
        price: Decimal,
        quantity: Decimal,
        side: Side,
    ) -> Result<Self, OrderValidationError> {
        let order = Self {
            base_asset,
            quote_asset,
            price,
            quantity,
            side,
        };
        order.validate()?;
        Ok(order)
    }

    pub fn validate(&self) -> Result<(), OrderValidationError> {
        if self.price <= Decimal::ZERO {
            return Err(OrderValidationError::NonPositivePrice(self.price.to_string()));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(OrderValidationError::NonPositiveQuantity(
                self.quantity.to_string(),
            ));
        }
        if self.base_asset == self.quote_asset {
            return Err(OrderValidationError::SameAsset);
        }
        self.spend().map(|_| ())
    }

    /// What the order locks up: a bid spends `quantity × price` of the quote
    /// asset, an ask spends `quantity` of the base asset.
    pub fn spend(&self) -> Result<TokenSpend, OrderValidationError> {
        match self.side {
            Side::Bid => Ok(TokenSpend {
                token: self.quote_asset,
                amount: self
                    .quantity
                    .checked_mul(self.price)
                    .ok_or(OrderValidationError::NotionalOverflow)?,
            }),
            Side::Ask => Ok(TokenSpend {
                token: self.base_asset,
                amount: self.quantity,
            }),
        }
    }

    /// `quantity × price` in quote units.
    pub fn notional(&self) -> Option<Decimal> {
        self.quantity.checked_mul(self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderValidationError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Price must be positive, got {0}")]
    NonPositivePrice(String),
    #[error("Quantity must be positive, got {0}")]
    NonPositiveQuantity(String),
    #[error("Invalid side: {0}")]
    InvalidSide(String),
    #[error("Invalid asset: {0}")]
    InvalidAsset(String),
    #[error("Base and quote asset must differ")]
    SameAsset,
    #[error("Order notional overflows")]
    NotionalOverflow,
}

// ─── OrderForm ───────────────────────────────────────────────────────────────

/// Raw order-entry form values, exactly as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderForm {
    pub base_asset: String,
    pub quote_asset: String,
    pub price: String,
    pub quantity: String,
    /// `buy`/`sell` or `bid`/`ask`.
    pub side: String,
}

impl OrderForm {
    pub fn new(
        base_asset: impl Into<String>,
        quote_asset: impl Into<String>,
        price: impl Into<String>,
        quantity: impl Into<String>,
        side: impl Into<String>,
    ) -> Self {
        Self {
            base_asset: base_asset.into(),
            quote_asset: quote_asset.into(),
            price: price.into(),
            quantity: quantity.into(),
            side: side.into(),
        }
    }

    /// Parse and validate. Pure: no network access.
    pub fn parse(&self) -> Result<OrderRequest, OrderValidationError> {
        let price = parse_decimal(&self.price)
            .map_err(|_| OrderValidationError::InvalidPrice(self.price.clone()))?;
        let quantity = parse_decimal(&self.quantity)
            .map_err(|_| OrderValidationError::InvalidQuantity(self.quantity.clone()))?;
        let side: Side = self.side.parse().map_err(OrderValidationError::InvalidSide)?;
        let base_asset =
            parse_token_address(&self.base_asset).map_err(OrderValidationError::InvalidAsset)?;
        let quote_asset =
            parse_token_address(&self.quote_asset).map_err(OrderValidationError::InvalidAsset)?;
        OrderRequest::new(base_asset, quote_asset, price, quantity, side)
    }
}

// ─── PendingOrder ────────────────────────────────────────────────────────────

/// An order held back until its token approvals are in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingOrder {
    pub account: Account,
    pub request: OrderRequest,
    pub created_at: DateTime<Utc>,
}

impl PendingOrder {
    pub fn new(account: Account, request: OrderRequest) -> Self {
        Self {
            account,
            request,
            created_at: Utc::now(),
        }
    }
}

// ─── OrderReceipt ────────────────────────────────────────────────────────────

/// A successfully registered order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderReceipt {
    pub order_id: String,
    /// Trades executed on registration. Non-empty means the order matched;
    /// the response does not say whether the fill was partial or full.
    pub trades: Vec<serde_json::Value>,
}

impl OrderReceipt {
    pub fn is_matched(&self) -> bool {
        !self.trades.is_empty()
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const BASE: &str = "0x8eFcF5c2DDDA6C1A63D8395965Ca6c0609CE32D5";
    const QUOTE: &str = "0x2B8C9cd22eFd93e15ff4A7cB7A0ef0A16Eb435C3";

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_bid_spends_quote_notional() {
        let order = OrderForm::new(BASE, QUOTE, "2", "10", "buy").parse().unwrap();
        let spend = order.spend().unwrap();
        assert_eq!(spend.token, order.quote_asset);
        assert_eq!(spend.amount, d("20"));
    }

    #[test]
    fn test_ask_spends_base_quantity() {
        let order = OrderForm::new(BASE, QUOTE, "2.5", "7.125", "sell").parse().unwrap();
        let spend = order.spend().unwrap();
        assert_eq!(spend.token, order.base_asset);
        assert_eq!(spend.amount, d("7.125"));
    }

    #[test]
    fn test_bid_notional_is_exact() {
        let order = OrderForm::new(BASE, QUOTE, "0.1", "0.3", "bid").parse().unwrap();
        assert_eq!(order.spend().unwrap().amount, d("0.03"));
    }

    #[test]
    fn test_rejects_non_numeric_and_non_positive() {
        assert!(matches!(
            OrderForm::new(BASE, QUOTE, "abc", "1", "buy").parse(),
            Err(OrderValidationError::InvalidPrice(_))
        ));
        assert!(matches!(
            OrderForm::new(BASE, QUOTE, "1", "", "buy").parse(),
            Err(OrderValidationError::InvalidQuantity(_))
        ));
        assert!(matches!(
            OrderForm::new(BASE, QUOTE, "0", "1", "buy").parse(),
            Err(OrderValidationError::NonPositivePrice(_))
        ));
        assert!(matches!(
            OrderForm::new(BASE, QUOTE, "1", "-3", "buy").parse(),
            Err(OrderValidationError::NonPositiveQuantity(_))
        ));
    }

    #[test]
    fn test_rejects_bad_side_and_assets() {
        assert!(matches!(
            OrderForm::new(BASE, QUOTE, "1", "1", "hold").parse(),
            Err(OrderValidationError::InvalidSide(_))
        ));
        assert!(matches!(
            OrderForm::new("SEI", QUOTE, "1", "1", "buy").parse(),
            Err(OrderValidationError::InvalidAsset(_))
        ));
        assert_eq!(
            OrderForm::new(BASE, BASE, "1", "1", "buy").parse(),
            Err(OrderValidationError::SameAsset)
        );
    }

    #[test]
    fn test_receipt_matched() {
        let resting = OrderReceipt {
            order_id: "1".to_string(),
            trades: vec![],
        };
        assert!(!resting.is_matched());
        let matched = OrderReceipt {
            order_id: "2".to_string(),
            trades: vec![serde_json::json!({"price": 1})],
        };
        assert!(matched.is_matched());
        assert_eq!(matched.trade_count(), 1);
    }
}
