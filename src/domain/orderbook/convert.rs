//! Conversion: OrderbookResponse → OrderbookSnapshot.

use super::wire::OrderbookResponse;
use super::OrderbookSnapshot;
use crate::domain::STATUS_OK;
use crate::error::SdkError;

impl TryFrom<(&str, OrderbookResponse)> for OrderbookSnapshot {
    type Error = SdkError;

    fn try_from((symbol, resp): (&str, OrderbookResponse)) -> Result<Self, Self::Error> {
        if resp.status_code != STATUS_OK {
            return Err(SdkError::Api {
                status_code: resp.status_code,
                message: resp
                    .message
                    .unwrap_or_else(|| "Failed to load orderbook".to_string()),
            });
        }
        let book = resp.orderbook.unwrap_or_default();
        Ok(OrderbookSnapshot::from_levels(
            symbol,
            book.asks.into_iter().map(|l| (l.price, l.amount)),
            book.bids.into_iter().map(|l| (l.price, l.amount)),
        ))
    }
}
