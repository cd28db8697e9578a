//! Wager Ledger
//!
//! Owns the session account and every placed wager. Handles:
//! - Placement (stake debited in the same step the wager is recorded)
//! - Settlement of matured wagers against the latest price
//! - Running win/loss totals and bounded history retention

use crate::error::WagerError;
use crate::types::{Account, Direction, LedgerSnapshot, Settlement, Wager, WagerOutcome};
use tracing::{debug, info, warn};

/// Settlement rules.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Minimum wager age before it settles (ms)
    pub maturation_delay_ms: i64,
    /// Payout ratio on a win
    pub payout_multiplier: f64,
    /// History cap; pending wagers are kept regardless
    pub max_retained: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            maturation_delay_ms: crate::config::MATURATION_DELAY_MS,
            payout_multiplier: crate::config::PAYOUT_MULTIPLIER,
            max_retained: 500,
        }
    }
}

/// Settle every pending wager in `wagers` that has matured by `now`.
///
/// Wins credit `amount * payout_multiplier` to `account`. Wagers that are
/// already settled are skipped, so repeated calls never settle twice.
pub fn settle_matured(
    wagers: &mut [Wager],
    account: &mut Account,
    current_price: f64,
    now: i64,
    config: &LedgerConfig,
) -> Vec<Settlement> {
    let mut settlements = Vec::new();

    for wager in wagers.iter_mut() {
        if !wager.is_pending() || !wager.is_matured(now, config.maturation_delay_ms) {
            continue;
        }

        if let Some(settlement) = wager.resolve(current_price, now, config.payout_multiplier) {
            if settlement.outcome == WagerOutcome::Win {
                account.credit(settlement.payout);
            }
            settlements.push(settlement);
        }
    }

    settlements
}

/// Account balance plus wager history for one session.
#[derive(Debug, Clone)]
pub struct WagerLedger {
    account: Account,
    wagers: Vec<Wager>,
    config: LedgerConfig,
    wins: u64,
    losses: u64,
    total_wagered: f64,
    total_paid_out: f64,
}

impl WagerLedger {
    /// Create a ledger with `starting_balance` and no wagers.
    pub fn new(starting_balance: f64, config: LedgerConfig) -> Self {
        Self {
            account: Account::new(starting_balance),
            wagers: Vec::new(),
            config,
            wins: 0,
            losses: 0,
            total_wagered: 0.0,
            total_paid_out: 0.0,
        }
    }

    /// Current account balance.
    pub fn balance(&self) -> f64 {
        self.account.balance
    }

    /// Copy of the account.
    pub fn account(&self) -> Account {
        self.account
    }

    /// Settlement parameters.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Retained wagers in placement order.
    pub fn wagers(&self) -> &[Wager] {
        &self.wagers
    }

    /// Look up a retained wager by id.
    pub fn get(&self, id: &str) -> Option<&Wager> {
        self.wagers.iter().find(|w| w.id == id)
    }

    /// Number of wagers not yet settled.
    pub fn pending_count(&self) -> usize {
        self.wagers.iter().filter(|w| w.is_pending()).count()
    }

    /// Up to `limit` wagers, newest first.
    pub fn recent(&self, limit: usize) -> Vec<Wager> {
        self.wagers.iter().rev().take(limit).cloned().collect()
    }

    /// What a winning wager of `amount` would credit.
    pub fn potential_payout(&self, amount: f64) -> f64 {
        amount * self.config.payout_multiplier
    }

    /// Place a wager at `current_price`.
    ///
    /// On success the stake is already debited. On error nothing changed.
    pub fn place_wager(
        &mut self,
        direction: Direction,
        amount: f64,
        current_price: f64,
        now: i64,
    ) -> Result<Wager, WagerError> {
        if !amount.is_finite() || amount <= 0.0 {
            warn!("Rejected {} wager: invalid amount {}", direction, amount);
            return Err(WagerError::InvalidAmount(amount));
        }

        if !self.account.can_afford(amount) {
            warn!(
                "Rejected {} wager of {}: balance is {}",
                direction, amount, self.account.balance
            );
            return Err(WagerError::InsufficientFunds {
                needed: amount,
                available: self.account.balance,
            });
        }

        let wager = Wager::new(direction, amount, current_price, now);
        self.account.debit(amount);
        self.total_wagered += amount;
        self.wagers.push(wager.clone());
        self.enforce_retention();

        debug!(
            "Placed wager {}: {} {} @ {:.2}, balance {:.2}",
            wager.id, direction, amount, current_price, self.account.balance
        );

        Ok(wager)
    }

    /// Settle matured wagers against `current_price`. Runs every tick.
    pub fn settle_matured(&mut self, current_price: f64, now: i64) -> Vec<Settlement> {
        let settlements = settle_matured(
            &mut self.wagers,
            &mut self.account,
            current_price,
            now,
            &self.config,
        );

        for settlement in &settlements {
            match settlement.outcome {
                WagerOutcome::Win => {
                    self.wins += 1;
                    self.total_paid_out += settlement.payout;
                }
                WagerOutcome::Loss => self.losses += 1,
            }
            info!(
                "Settled wager {} ({} {} @ {:.2} -> {:.2}): {}, payout {:.2}",
                settlement.wager_id,
                settlement.direction,
                settlement.amount,
                settlement.entry_price,
                settlement.exit_price,
                settlement.outcome,
                settlement.payout
            );
        }

        if !settlements.is_empty() {
            self.enforce_retention();
        }

        settlements
    }

    /// Drop the oldest settled wagers while over the history cap.
    fn enforce_retention(&mut self) {
        while self.wagers.len() > self.config.max_retained {
            match self.wagers.iter().position(|w| !w.is_pending()) {
                Some(idx) => {
                    self.wagers.remove(idx);
                }
                None => break,
            }
        }
    }

    /// Copy of balance, wagers and counters.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            balance: self.account.balance,
            wagers: self.wagers.clone(),
            pending: self.pending_count(),
            wins: self.wins,
            losses: self.losses,
            total_wagered: self.total_wagered,
            total_paid_out: self.total_paid_out,
        }
    }
}
