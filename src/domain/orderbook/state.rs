//! Orderbook state containers — app-owned, SDK-provided update logic.

use super::BookLevel;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// An immutable view of one orderbook at one point in time.
///
/// Asks are sorted ascending and bids descending by price; each level's
/// `total` is the running size from the top of its side. A snapshot is never
/// mutated, only replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderbookSnapshot {
    pub symbol: String,
    asks: Vec<BookLevel>,
    bids: Vec<BookLevel>,
    pub fetched_at: DateTime<Utc>,
}

impl OrderbookSnapshot {
    /// Build from `(price, amount)` pairs in any order.
    pub fn from_levels(
        symbol: impl Into<String>,
        asks: impl IntoIterator<Item = (Decimal, Decimal)>,
        bids: impl IntoIterator<Item = (Decimal, Decimal)>,
    ) -> Self {
        let mut asks: Vec<_> = asks.into_iter().collect();
        let mut bids: Vec<_> = bids.into_iter().collect();
        asks.sort_by(|a, b| a.0.cmp(&b.0));
        bids.sort_by(|a, b| b.0.cmp(&a.0));

        Self {
            symbol: symbol.into(),
            asks: cumulate(asks),
            bids: cumulate(bids),
            fetched_at: Utc::now(),
        }
    }

    pub fn empty(symbol: impl Into<String>) -> Self {
        Self::from_levels(symbol, Vec::new(), Vec::new())
    }

    /// Asks sorted by price ascending.
    pub fn asks(&self) -> &[BookLevel] {
        &self.asks
    }

    /// Bids sorted by price descending.
    pub fn bids(&self) -> &[BookLevel] {
        &self.bids
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.first().map(|l| l.price)
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.first().map(|l| l.price)
    }

    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()? - self.best_bid()?)
    }

    pub fn mid_price(&self) -> Option<Decimal> {
        Some((self.best_ask()? + self.best_bid()?) / Decimal::from(2))
    }

    /// Best ask, falling back to best bid.
    pub fn last_price(&self) -> Option<Decimal> {
        self.best_ask().or_else(|| self.best_bid())
    }

    pub fn is_empty(&self) -> bool {
        self.asks.is_empty() && self.bids.is_empty()
    }
}

fn cumulate(levels: Vec<(Decimal, Decimal)>) -> Vec<BookLevel> {
    let mut running = Decimal::ZERO;
    levels
        .into_iter()
        .map(|(price, amount)| {
            running += amount;
            BookLevel {
                price,
                amount,
                total: running,
            }
        })
        .collect()
}

/// The current snapshot of one symbol plus the sequence number of the request
/// that produced it.
///
/// Fetches are numbered when they are issued. A completed fetch replaces the
/// snapshot only if it was issued after the one currently shown, so a slow
/// periodic poll can never overwrite a newer explicit refresh.
#[derive(Debug, Clone, Default)]
pub struct OrderbookState {
    snapshot: Option<OrderbookSnapshot>,
    applied_seq: u64,
}

impl OrderbookState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot if `seq` is newer. Returns whether it was applied.
    pub fn apply(&mut self, seq: u64, snapshot: OrderbookSnapshot) -> bool {
        if self.snapshot.is_some() && seq <= self.applied_seq {
            tracing::debug!(
                seq,
                applied = self.applied_seq,
                symbol = %snapshot.symbol,
                "Dropping stale orderbook snapshot"
            );
            return false;
        }
        self.applied_seq = seq;
        self.snapshot = Some(snapshot);
        true
    }

    pub fn snapshot(&self) -> Option<&OrderbookSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn applied_seq(&self) -> u64 {
        self.applied_seq
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
        self.applied_seq = 0;
    }
}
