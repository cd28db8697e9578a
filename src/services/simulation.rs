//! Single-owner simulation state.
//!
//! One [`Simulation`] holds the price, series window, order book and ledger.
//! [`Simulation::tick`] advances all of them as one step; nothing here knows
//! about timers or threads.

use crate::config::Config;
use crate::error::WagerError;
use crate::services::ledger::{LedgerConfig, WagerLedger};
use crate::services::orderbook::OrderBookSynthesizer;
use crate::services::price_generator::PriceGenerator;
use crate::services::random::RandomSource;
use crate::services::series_window::SeriesWindow;
use crate::types::{
    Direction, PlacementReceipt, PriceSample, Settlement, SyntheticOrderBook, TickSnapshot,
};
use tracing::debug;

pub struct Simulation {
    generator: PriceGenerator,
    window: SeriesWindow,
    synthesizer: OrderBookSynthesizer,
    ledger: WagerLedger,
    order_book: SyntheticOrderBook,
    current_price: f64,
    previous_price: f64,
    tick: u64,
    last_tick_at: i64,
    rng: Box<dyn RandomSource + Send>,
}

impl Simulation {
    /// Build a session at `now_ms`: backfill history from the initial price
    /// and derive the first order book.
    pub fn new(config: &Config, now_ms: i64, mut rng: Box<dyn RandomSource + Send>) -> Self {
        let generator = PriceGenerator::new(config.volatility);
        let synthesizer = OrderBookSynthesizer::with_levels(config.book_levels);

        let history = generator.backfill(
            config.initial_price,
            config.backfill_points,
            now_ms.div_euclid(1000),
            rng.as_mut(),
        );
        let current_price = history
            .last()
            .map(|s| s.value)
            .unwrap_or(config.initial_price);
        let previous_price = history
            .iter()
            .rev()
            .nth(1)
            .map(|s| s.value)
            .unwrap_or(current_price);
        let window = SeriesWindow::from_samples(config.window_capacity, history);
        let order_book = synthesizer.synthesize(current_price, rng.as_mut());

        let ledger = WagerLedger::new(
            config.starting_balance,
            LedgerConfig {
                maturation_delay_ms: config.maturation_delay_ms,
                payout_multiplier: config.payout_multiplier,
                max_retained: config.max_retained_wagers,
            },
        );

        debug!(
            "Simulation backfilled {} samples, live price {:.2}",
            window.len(),
            current_price
        );

        Self {
            generator,
            window,
            synthesizer,
            ledger,
            order_book,
            current_price,
            previous_price,
            tick: 0,
            last_tick_at: now_ms,
            rng,
        }
    }

    /// One tick: step the price, record it, rebuild the book, settle
    /// matured wagers against the new price.
    pub fn tick(&mut self, now_ms: i64) -> TickSnapshot {
        let previous = self.current_price;
        let price = self.generator.step(previous, self.rng.as_mut());

        self.previous_price = previous;
        self.current_price = price;
        self.window
            .push(PriceSample::new(now_ms.div_euclid(1000), price));
        self.order_book = self.synthesizer.synthesize(price, self.rng.as_mut());
        let settlements = self.ledger.settle_matured(price, now_ms);

        self.tick += 1;
        self.last_tick_at = now_ms;

        self.build_snapshot(settlements)
    }

    /// Place a wager at the current price.
    pub fn place_wager(
        &mut self,
        direction: Direction,
        amount: f64,
        now_ms: i64,
    ) -> Result<PlacementReceipt, WagerError> {
        let balance_before = self.ledger.balance();
        let wager = self
            .ledger
            .place_wager(direction, amount, self.current_price, now_ms)?;

        Ok(PlacementReceipt {
            wager,
            balance_before,
            balance_after: self.ledger.balance(),
        })
    }

    /// Current state without advancing.
    pub fn snapshot(&self) -> TickSnapshot {
        self.build_snapshot(Vec::new())
    }

    fn build_snapshot(&self, settlements: Vec<Settlement>) -> TickSnapshot {
        TickSnapshot {
            tick: self.tick,
            timestamp: self.last_tick_at,
            current_price: self.current_price,
            previous_price: self.previous_price,
            direction: Direction::of_move(self.previous_price, self.current_price),
            series: self.window.snapshot(),
            order_book: self.order_book.clone(),
            ledger: self.ledger.snapshot(),
            settlements,
        }
    }

    /// Latest price.
    pub fn current_price(&self) -> f64 {
        self.current_price
    }

    /// Ticks applied so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Get the wager ledger.
    pub fn ledger(&self) -> &WagerLedger {
        &self.ledger
    }

    /// Get the series window.
    pub fn window(&self) -> &SeriesWindow {
        &self.window
    }

    /// Get the current order book.
    pub fn order_book(&self) -> &SyntheticOrderBook {
        &self.order_book
    }
}
