//! Wager, account and settlement types.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Direction;

/// Terminal result of a wager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WagerOutcome {
    Win,
    Loss,
}

impl fmt::Display for WagerOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WagerOutcome::Win => write!(f, "win"),
            WagerOutcome::Loss => write!(f, "loss"),
        }
    }
}

/// Lifecycle state of a wager: PENDING -> WON | LOST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WagerStatus {
    Pending,
    Won,
    Lost,
}

/// A timed up/down prediction against the simulated price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wager {
    /// Unique wager ID
    pub id: String,
    pub direction: Direction,
    /// Stake debited at placement
    pub amount: f64,
    /// Price at placement
    pub entry_price: f64,
    /// Placement time (unix ms)
    pub placed_at: i64,
    /// Set exactly once, at settlement
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<WagerOutcome>,
    /// Price the wager settled against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_price: Option<f64>,
    /// Settlement time (unix ms)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<i64>,
    /// Amount credited on settlement (0 on loss)
    pub payout: f64,
}

impl Wager {
    /// Create a new pending wager.
    pub fn new(direction: Direction, amount: f64, entry_price: f64, placed_at: i64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            direction,
            amount,
            entry_price,
            placed_at,
            outcome: None,
            exit_price: None,
            settled_at: None,
            payout: 0.0,
        }
    }

    /// Lifecycle state derived from the outcome.
    pub fn status(&self) -> WagerStatus {
        match self.outcome {
            None => WagerStatus::Pending,
            Some(WagerOutcome::Win) => WagerStatus::Won,
            Some(WagerOutcome::Loss) => WagerStatus::Lost,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.outcome.is_none()
    }

    /// Whether the wager is old enough to settle at `now`.
    pub fn is_matured(&self, now: i64, maturation_delay_ms: i64) -> bool {
        now - self.placed_at >= maturation_delay_ms
    }

    /// Outcome if the wager settled against `price`.
    ///
    /// Strict comparison in both directions: a flat price loses.
    pub fn outcome_at(&self, price: f64) -> WagerOutcome {
        let is_win = match self.direction {
            Direction::Up => price > self.entry_price,
            Direction::Down => price < self.entry_price,
        };
        if is_win {
            WagerOutcome::Win
        } else {
            WagerOutcome::Loss
        }
    }

    /// Resolve a pending wager. Returns `None` if it was already settled.
    pub(crate) fn resolve(
        &mut self,
        exit_price: f64,
        now: i64,
        payout_multiplier: f64,
    ) -> Option<Settlement> {
        if self.outcome.is_some() {
            return None;
        }

        let outcome = self.outcome_at(exit_price);
        let payout = match outcome {
            WagerOutcome::Win => self.amount * payout_multiplier,
            WagerOutcome::Loss => 0.0,
        };

        self.outcome = Some(outcome);
        self.exit_price = Some(exit_price);
        self.settled_at = Some(now);
        self.payout = payout;

        Some(Settlement {
            wager_id: self.id.clone(),
            direction: self.direction,
            amount: self.amount,
            entry_price: self.entry_price,
            exit_price,
            outcome,
            payout,
            settled_at: now,
        })
    }
}

/// Record of a wager leaving the pending state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settlement {
    pub wager_id: String,
    pub direction: Direction,
    pub amount: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub outcome: WagerOutcome,
    /// Credited to the balance
    pub payout: f64,
    pub settled_at: i64,
}

impl Settlement {
    /// Profit relative to the stake (negative on loss).
    pub fn pnl(&self) -> f64 {
        self.payout - self.amount
    }
}

/// Session account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub balance: f64,
}

impl Account {
    pub fn new(balance: f64) -> Self {
        Self { balance }
    }

    /// Check if `amount` can be debited.
    pub fn can_afford(&self, amount: f64) -> bool {
        amount <= self.balance
    }

    pub(crate) fn debit(&mut self, amount: f64) {
        self.balance -= amount;
    }

    pub(crate) fn credit(&mut self, amount: f64) {
        self.balance += amount;
    }
}
