//! Wire types for `POST /api/orderbook`.

use crate::shared::serde_util::decimal_lenient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct OrderbookPayload {
    /// `{base_address}_{quote_address}`
    pub symbol: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct OrderbookResponse {
    pub status_code: i64,
    #[serde(default)]
    pub orderbook: Option<OrderbookBody>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OrderbookBody {
    #[serde(default)]
    pub asks: Vec<RestBookLevel>,
    #[serde(default)]
    pub bids: Vec<RestBookLevel>,
}

/// A price level as sent by the backend. Any server-side `total` is ignored;
/// cumulative totals are recomputed from the sorted levels.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RestBookLevel {
    #[serde(deserialize_with = "decimal_lenient::deserialize")]
    pub price: Decimal,
    #[serde(
        alias = "size",
        alias = "quantity",
        deserialize_with = "decimal_lenient::deserialize"
    )]
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orderbook_response_numbers_and_aliases() {
        let resp: OrderbookResponse = serde_json::from_str(
            r#"{"status_code":1,"orderbook":{
                "asks":[{"price":2.5,"amount":3,"total":3}],
                "bids":[{"price":"2.4","size":"1.5"}]
            }}"#,
        )
        .unwrap();
        let book = resp.orderbook.unwrap();
        assert_eq!(book.asks[0].price, Decimal::new(25, 1));
        assert_eq!(book.asks[0].amount, Decimal::from(3));
        assert_eq!(book.bids[0].amount, Decimal::new(15, 1));
    }

    #[test]
    fn test_orderbook_response_missing_sides() {
        let resp: OrderbookResponse =
            serde_json::from_str(r#"{"status_code":1,"orderbook":{}}"#).unwrap();
        let book = resp.orderbook.unwrap();
        assert!(book.asks.is_empty() && book.bids.is_empty());
    }
}
