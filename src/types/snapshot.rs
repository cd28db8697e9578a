//! Immutable views handed to the presentation layer.

use serde::{Deserialize, Serialize};

use super::{Direction, PriceSample, Settlement, SyntheticOrderBook, Wager};

/// Copy of the series window at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSnapshot {
    /// Samples sorted by time ascending
    pub samples: Vec<PriceSample>,
    pub capacity: usize,
}

impl SeriesSnapshot {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn first(&self) -> Option<&PriceSample> {
        self.samples.first()
    }

    pub fn last(&self) -> Option<&PriceSample> {
        self.samples.last()
    }

    /// Highest value in the window.
    pub fn high(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.value).reduce(f64::max)
    }

    /// Lowest value in the window.
    pub fn low(&self) -> Option<f64> {
        self.samples.iter().map(|s| s.value).reduce(f64::min)
    }

    /// Absolute change across the window.
    pub fn change(&self) -> Option<f64> {
        Some(self.last()?.value - self.first()?.value)
    }

    /// Change across the window as a percentage of the first sample.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.first()?.value;
        if first == 0.0 {
            return None;
        }
        Some(self.change()? / first * 100.0)
    }
}

/// Balance and wager history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub balance: f64,
    /// Retained wagers in placement order
    pub wagers: Vec<Wager>,
    pub pending: usize,
    pub wins: u64,
    pub losses: u64,
    /// Sum of all accepted stakes
    pub total_wagered: f64,
    /// Sum of all win payouts
    pub total_paid_out: f64,
}

impl LedgerSnapshot {
    /// Realized result of settled wagers, net of stakes still pending.
    pub fn net_pnl(&self) -> f64 {
        self.total_paid_out - self.total_wagered
    }
}

/// Fully updated state published once per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickSnapshot {
    /// Monotonic tick counter, starting at 1
    pub tick: u64,
    /// Tick time (unix ms)
    pub timestamp: i64,
    pub current_price: f64,
    pub previous_price: f64,
    pub direction: Direction,
    pub series: SeriesSnapshot,
    pub order_book: SyntheticOrderBook,
    pub ledger: LedgerSnapshot,
    /// Wagers settled on this tick
    pub settlements: Vec<Settlement>,
}

/// Result of an accepted placement, with the balance on either side of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementReceipt {
    pub wager: Wager,
    pub balance_before: f64,
    pub balance_after: f64,
}
