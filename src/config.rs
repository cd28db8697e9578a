use crate::error::{AppError, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Reference starting price.
pub const INITIAL_PRICE: f64 = 45_000.0;
/// Maximum per-tick price swing.
pub const VOLATILITY: f64 = 15.0;
/// Simulation cadence.
pub const TICK_INTERVAL_MS: u64 = 1_000;
/// Retained sample count for the chart window.
pub const WINDOW_CAPACITY: usize = 200;
/// Samples synthesized before live ticking starts.
pub const BACKFILL_POINTS: usize = 100;
/// Delay after which a pending wager is forced to settle.
pub const MATURATION_DELAY_MS: i64 = 5_000;
/// Win payout ratio applied to the wager amount.
pub const PAYOUT_MULTIPLIER: f64 = 1.85;
/// Initial account balance.
pub const STARTING_BALANCE: f64 = 10_000.0;
/// Largest accepted starting price magnitude. Beyond roughly 1e15 a 0.1
/// book offset rounds away and levels collapse onto the mid price.
pub const MAX_INITIAL_PRICE: f64 = 1e12;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Price the backfill starts from.
    pub initial_price: f64,
    /// Per-tick max price swing (step is uniform in +/- volatility / 2).
    pub volatility: f64,
    /// Simulation tick interval (ms).
    pub tick_interval_ms: u64,
    /// Series window capacity.
    pub window_capacity: usize,
    /// Number of backfilled samples.
    pub backfill_points: usize,
    /// Wager maturation delay (ms).
    pub maturation_delay_ms: i64,
    /// Win payout multiplier.
    pub payout_multiplier: f64,
    /// Initial account balance.
    pub starting_balance: f64,
    /// Maximum wagers kept for history. Pending wagers are never evicted.
    pub max_retained_wagers: usize,
    /// Levels per side in the synthetic order book.
    pub book_levels: usize,
    /// Chat feed cadence (ms).
    pub chat_interval_ms: u64,
    /// Chat messages retained.
    pub chat_capacity: usize,
    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_price: INITIAL_PRICE,
            volatility: VOLATILITY,
            tick_interval_ms: TICK_INTERVAL_MS,
            window_capacity: WINDOW_CAPACITY,
            backfill_points: BACKFILL_POINTS,
            maturation_delay_ms: MATURATION_DELAY_MS,
            payout_multiplier: PAYOUT_MULTIPLIER,
            starting_balance: STARTING_BALANCE,
            max_retained_wagers: 500,
            book_levels: 12,
            chat_interval_ms: 3_500,
            chat_capacity: 30,
            seed: None,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            initial_price: env_or("INITIAL_PRICE", defaults.initial_price),
            volatility: env_or("VOLATILITY", defaults.volatility),
            tick_interval_ms: env_or("TICK_INTERVAL_MS", defaults.tick_interval_ms),
            window_capacity: env_or("WINDOW_CAPACITY", defaults.window_capacity),
            backfill_points: env_or("BACKFILL_POINTS", defaults.backfill_points),
            maturation_delay_ms: env_or("MATURATION_DELAY_MS", defaults.maturation_delay_ms),
            payout_multiplier: env_or("PAYOUT_MULTIPLIER", defaults.payout_multiplier),
            starting_balance: env_or("STARTING_BALANCE", defaults.starting_balance),
            max_retained_wagers: env_or("MAX_RETAINED_WAGERS", defaults.max_retained_wagers),
            book_levels: env_or("ORDER_BOOK_LEVELS", defaults.book_levels),
            chat_interval_ms: env_or("CHAT_INTERVAL_MS", defaults.chat_interval_ms),
            chat_capacity: env_or("CHAT_CAPACITY", defaults.chat_capacity),
            seed: env::var("SIM_SEED").ok().and_then(|v| v.trim().parse().ok()),
        }
    }

    /// Reject settings the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !self.initial_price.is_finite() {
            return Err(AppError::Config("initial price must be finite".into()));
        }
        if self.initial_price.abs() > MAX_INITIAL_PRICE {
            return Err(AppError::Config(format!(
                "initial price magnitude must not exceed {:e}",
                MAX_INITIAL_PRICE
            )));
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(AppError::Config(
                "volatility must be finite and non-negative".into(),
            ));
        }
        if self.tick_interval_ms == 0 || self.chat_interval_ms == 0 {
            return Err(AppError::Config("intervals must be non-zero".into()));
        }
        if self.window_capacity == 0 {
            return Err(AppError::Config("window capacity must be non-zero".into()));
        }
        if self.backfill_points == 0 || self.backfill_points > self.window_capacity {
            return Err(AppError::Config(format!(
                "backfill points must be in 1..={}",
                self.window_capacity
            )));
        }
        if self.maturation_delay_ms < 0 {
            return Err(AppError::Config("maturation delay must be non-negative".into()));
        }
        if !(self.payout_multiplier.is_finite() && self.payout_multiplier > 0.0) {
            return Err(AppError::Config("payout multiplier must be positive".into()));
        }
        if !(self.starting_balance.is_finite() && self.starting_balance >= 0.0) {
            return Err(AppError::Config("starting balance must be non-negative".into()));
        }
        if self.book_levels == 0 {
            return Err(AppError::Config("order book needs at least one level".into()));
        }
        Ok(())
    }

    /// Tick interval as a `Duration`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Chat interval as a `Duration`.
    pub fn chat_interval(&self) -> Duration {
        Duration::from_millis(self.chat_interval_ms)
    }
}
