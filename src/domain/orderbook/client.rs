//! Orderbooks sub-client — fetch, refresh, cached snapshots.

use crate::client::HyperFillClient;
use crate::domain::activity::LogKind;
use crate::domain::orderbook::OrderbookSnapshot;
use crate::error::SdkError;
use crate::shared::market_symbol;
use alloy_primitives::Address;

/// Sub-client for orderbook operations.
pub struct Orderbooks<'a> {
    pub(crate) client: &'a HyperFillClient,
}

impl<'a> Orderbooks<'a> {
    /// Fetch a fresh snapshot without touching the shared state.
    pub async fn get(&self, symbol: &str) -> Result<OrderbookSnapshot, SdkError> {
        let resp = self.client.http.get_orderbook(symbol).await?;
        OrderbookSnapshot::try_from((symbol, resp))
    }

    /// Snapshot for the `base`/`quote` market.
    pub async fn get_market(
        &self,
        base: &Address,
        quote: &Address,
    ) -> Result<OrderbookSnapshot, SdkError> {
        self.get(&market_symbol(base, quote)).await
    }

    /// Fetch and store a snapshot, logging the outcome.
    ///
    /// The fetch is numbered before it is sent; if a fetch issued later has
    /// already been applied, this result is dropped and the newer snapshot is
    /// returned instead.
    pub async fn refresh(&self, symbol: &str) -> Result<OrderbookSnapshot, SdkError> {
        let seq = self.client.next_orderbook_seq();

        let snapshot = match self.get(symbol).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let message = match &e {
                    SdkError::Api { .. } => "Failed to load orderbook".to_string(),
                    other => format!("Orderbook error: {}", other),
                };
                self.client.log(message, LogKind::Error).await;
                return Err(e);
            }
        };

        let (applied, current) = {
            let mut books = self.client.orderbooks.write().await;
            let state = books.entry(symbol.to_string()).or_default();
            let applied = state.apply(seq, snapshot.clone());
            (applied, state.snapshot().cloned().unwrap_or(snapshot))
        };
        // A dropped snapshot was superseded by one that already logged itself.
        if applied {
            self.client
                .log(
                    format!(
                        "Orderbook loaded: {} asks, {} bids",
                        current.asks().len(),
                        current.bids().len()
                    ),
                    LogKind::Info,
                )
                .await;
        }
        Ok(current)
    }

    /// Last stored snapshot for `symbol`.
    pub async fn snapshot(&self, symbol: &str) -> Option<OrderbookSnapshot> {
        self.client
            .orderbooks
            .read()
            .await
            .get(symbol)
            .and_then(|s| s.snapshot().cloned())
    }

    pub async fn clear_cache(&self) {
        self.client.orderbooks.write().await.clear();
    }
}
