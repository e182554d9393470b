//! Orderbook domain — price levels, snapshots, polling.

#[cfg(feature = "http")]
pub mod client;
mod convert;
#[cfg(feature = "http")]
pub mod poller;
pub mod state;
pub mod wire;

#[cfg(feature = "http")]
pub use poller::OrderbookPoller;
pub use state::{OrderbookSnapshot, OrderbookState};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One price level with the running size from the top of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookLevel {
    pub price: Decimal,
    pub amount: Decimal,
    pub total: Decimal,
}
