//! Order Book types for the synthetic depth ladder.

use serde::{Deserialize, Serialize};

/// Side of the book a level sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookSide {
    /// Resting buy interest, priced below mid.
    Bid,
    /// Resting sell interest, priced above mid.
    Ask,
}

/// A single price level in the synthetic order book.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBookLevel {
    /// Price at this level
    pub price: f64,
    /// Quantity resting at this price
    pub size: f64,
    /// Notional: size * price
    pub total: f64,
    pub side: BookSide,
    /// Width of the depth bar, 20-100
    pub depth_percent: f64,
}

/// Synthetic order book derived from a mid price.
///
/// Both sides are sorted by price descending, so the lowest ask is the last
/// ask row and the highest bid is the first bid row; both sit next to the
/// mid-price marker when rendered asks-above-bids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticOrderBook {
    /// Price the book was derived from
    pub mid_price: f64,
    /// Ask levels, sorted by price descending
    pub asks: Vec<OrderBookLevel>,
    /// Bid levels, sorted by price descending
    pub bids: Vec<OrderBookLevel>,
    /// Lowest ask price
    pub best_ask: f64,
    /// Highest bid price
    pub best_bid: f64,
    /// Spread: best_ask - best_bid
    pub spread: f64,
    /// Total bid size
    pub bid_total: f64,
    /// Total ask size
    pub ask_total: f64,
    /// Share of resting size on the bid side, 0-100
    pub bid_share_pct: f64,
    /// Order book imbalance: (bid_total - ask_total) / (bid_total + ask_total)
    /// Range: -1.0 (all asks) to +1.0 (all bids)
    pub imbalance: f64,
}

impl SyntheticOrderBook {
    /// Build the book from unsorted sides, computing the aggregates.
    pub fn from_levels(
        mid_price: f64,
        mut asks: Vec<OrderBookLevel>,
        mut bids: Vec<OrderBookLevel>,
    ) -> Self {
        asks.sort_by(|a, b| b.price.total_cmp(&a.price));
        bids.sort_by(|a, b| b.price.total_cmp(&a.price));

        let best_ask = asks.last().map(|l| l.price).unwrap_or(mid_price);
        let best_bid = bids.first().map(|l| l.price).unwrap_or(mid_price);

        let bid_total: f64 = bids.iter().map(|l| l.size).sum();
        let ask_total: f64 = asks.iter().map(|l| l.size).sum();
        let total = bid_total + ask_total;
        let (bid_share_pct, imbalance) = if total > 0.0 {
            (bid_total / total * 100.0, (bid_total - ask_total) / total)
        } else {
            (50.0, 0.0)
        };

        Self {
            mid_price,
            asks,
            bids,
            best_ask,
            best_bid,
            spread: best_ask - best_bid,
            bid_total,
            ask_total,
            bid_share_pct,
            imbalance,
        }
    }

    /// An empty book centred on `mid_price`.
    pub fn empty(mid_price: f64) -> Self {
        Self::from_levels(mid_price, Vec::new(), Vec::new())
    }
}
