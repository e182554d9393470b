//! Fixed-interval orderbook polling.

use crate::client::HyperFillClient;
use crate::domain::orderbook::OrderbookSnapshot;
use crate::error::SdkError;
use futures_util::Stream;
use std::time::Duration;

/// Refreshes one symbol's snapshot at a fixed interval.
///
/// Each poll goes through [`Orderbooks::refresh`](super::client::Orderbooks::refresh),
/// so polls and explicit refreshes share one request sequence and a late poll
/// never replaces a newer snapshot.
#[derive(Clone)]
pub struct OrderbookPoller {
    client: HyperFillClient,
    symbol: String,
    interval: Duration,
}

impl OrderbookPoller {
    pub fn new(client: HyperFillClient, symbol: &str, interval: Duration) -> Self {
        Self {
            client,
            symbol: symbol.to_string(),
            interval,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One poll.
    pub async fn poll_once(&self) -> Result<OrderbookSnapshot, SdkError> {
        self.client.orderbooks().refresh(&self.symbol).await
    }

    /// Endless stream of poll results: one immediately, then one per interval.
    /// Errors are yielded, not fatal; the next tick polls again. Drop the
    /// stream to stop polling.
    pub fn stream(self) -> impl Stream<Item = Result<OrderbookSnapshot, SdkError>> {
        async_stream::stream! {
            loop {
                let result = self.poll_once().await;
                if let Err(e) = &result {
                    tracing::debug!(symbol = %self.symbol, error = %e, "Orderbook poll failed");
                }
                yield result;
                futures_timer::Delay::new(self.interval).await;
            }
        }
    }
}
