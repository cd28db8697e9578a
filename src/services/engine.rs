//! Simulation Engine
//!
//! Coordinates the live session:
//! - Ticks the simulation on a fixed interval and publishes each snapshot
//! - Serializes wager placement against ticks through one lock
//! - Runs the independent chat feed on its own interval
//!
//! Stopping (or dropping) the engine cancels both timers.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::chat_feed::ChatFeed;
use crate::services::clock::{Clock, SessionClock};
use crate::services::random::{RandomSource, RngSource};
use crate::services::scheduler::IntervalScheduler;
use crate::services::simulation::Simulation;
use crate::types::{ChatMessage, Direction, PlacementReceipt, TickSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tracing::{debug, info};

/// Buffered snapshots per subscriber before the slowest one starts lagging.
const TICK_CHANNEL_CAPACITY: usize = 64;
const CHAT_CHANNEL_CAPACITY: usize = 64;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

struct ChatState {
    feed: ChatFeed,
    rng: Box<dyn RandomSource + Send>,
}

/// Live simulation session.
pub struct SimulationEngine {
    config: Config,
    state: Arc<Mutex<Simulation>>,
    chat: Arc<Mutex<ChatState>>,
    clock: Arc<dyn Clock>,
    tick_tx: broadcast::Sender<TickSnapshot>,
    chat_tx: broadcast::Sender<ChatMessage>,
    tick_scheduler: IntervalScheduler,
    chat_scheduler: IntervalScheduler,
    stopped: AtomicBool,
}

impl SimulationEngine {
    /// Create an engine with the session clock and a seeded or entropy RNG.
    pub fn new(config: Config) -> Result<Self> {
        let price_rng = Box::new(RngSource::new(config.seed));
        let chat_rng = Box::new(RngSource::new(config.seed.map(|s| s.wrapping_add(1))));
        Self::with_parts(config, Arc::new(SessionClock::new()), price_rng, chat_rng)
    }

    /// Create an engine with explicit time and randomness sources.
    pub fn with_parts(
        config: Config,
        clock: Arc<dyn Clock>,
        price_rng: Box<dyn RandomSource + Send>,
        chat_rng: Box<dyn RandomSource + Send>,
    ) -> Result<Self> {
        config.validate()?;

        let simulation = Simulation::new(&config, clock.now_ms(), price_rng);
        let (tick_tx, _) = broadcast::channel(TICK_CHANNEL_CAPACITY);
        let (chat_tx, _) = broadcast::channel(CHAT_CHANNEL_CAPACITY);

        Ok(Self {
            chat: Arc::new(Mutex::new(ChatState {
                feed: ChatFeed::new(config.chat_capacity),
                rng: chat_rng,
            })),
            config,
            state: Arc::new(Mutex::new(simulation)),
            clock,
            tick_tx,
            chat_tx,
            tick_scheduler: IntervalScheduler::new("price tick"),
            chat_scheduler: IntervalScheduler::new("chat feed"),
            stopped: AtomicBool::new(false),
        })
    }

    /// Configuration the engine was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Start ticking. Must be called from within a tokio runtime.
    pub fn start(&mut self) -> Result<()> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(AppError::EngineStopped);
        }
        if self.tick_scheduler.is_running() {
            debug!("Simulation engine already running");
            return Ok(());
        }

        let state = self.state.clone();
        let clock = self.clock.clone();
        let tick_tx = self.tick_tx.clone();
        self.tick_scheduler
            .start(self.config.tick_interval(), move || {
                let snapshot = lock(&state).tick(clock.now_ms());
                debug!("Tick {}: {:.2}", snapshot.tick, snapshot.current_price);
                // No subscribers is fine.
                let _ = tick_tx.send(snapshot);
            });

        let chat = self.chat.clone();
        let clock = self.clock.clone();
        let chat_tx = self.chat_tx.clone();
        self.chat_scheduler
            .start(self.config.chat_interval(), move || {
                let message = {
                    let mut chat = lock(&chat);
                    let ChatState { feed, rng } = &mut *chat;
                    feed.next_message(rng.as_mut(), clock.now_ms())
                };
                let _ = chat_tx.send(message);
            });

        info!(
            "Simulation engine started: tick {}ms, maturation {}ms, payout {}x",
            self.config.tick_interval_ms, self.config.maturation_delay_ms, self.config.payout_multiplier
        );
        Ok(())
    }

    /// Cease all ticking. Waits for the timer tasks to exit; later
    /// placements fail with [`AppError::EngineStopped`].
    pub async fn stop(&mut self) {
        if self.stopped.swap(true, Ordering::SeqCst) {
            return;
        }
        self.tick_scheduler.stop().await;
        self.chat_scheduler.stop().await;
        info!("Simulation engine stopped");
    }

    /// Whether the tick timer is active.
    pub fn is_running(&self) -> bool {
        !self.stopped.load(Ordering::SeqCst) && self.tick_scheduler.is_running()
    }

    /// Subscribe to per-tick snapshots.
    pub fn subscribe(&self) -> broadcast::Receiver<TickSnapshot> {
        self.tick_tx.subscribe()
    }

    /// Subscribe to chat messages.
    pub fn subscribe_chat(&self) -> broadcast::Receiver<ChatMessage> {
        self.chat_tx.subscribe()
    }

    /// Place a wager at the latest ticked price.
    ///
    /// Holds the state lock for the whole placement, so it lands entirely
    /// before or after any concurrent tick.
    pub fn place_wager(&self, direction: Direction, amount: f64) -> Result<PlacementReceipt> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(AppError::EngineStopped);
        }
        let mut state = lock(&self.state);
        let receipt = state.place_wager(direction, amount, self.clock.now_ms())?;
        Ok(receipt)
    }

    /// Advance one tick immediately, outside the timer, and publish it.
    pub fn tick_now(&self) -> Result<TickSnapshot> {
        if self.stopped.load(Ordering::SeqCst) {
            return Err(AppError::EngineStopped);
        }
        let snapshot = lock(&self.state).tick(self.clock.now_ms());
        let _ = self.tick_tx.send(snapshot.clone());
        Ok(snapshot)
    }

    /// Current state without advancing.
    pub fn snapshot(&self) -> TickSnapshot {
        lock(&self.state).snapshot()
    }

    /// Current account balance.
    pub fn balance(&self) -> f64 {
        lock(&self.state).ledger().balance()
    }

    /// Latest ticked price.
    pub fn current_price(&self) -> f64 {
        lock(&self.state).current_price()
    }

    /// What a winning wager of `amount` would credit.
    pub fn potential_payout(&self, amount: f64) -> f64 {
        lock(&self.state).ledger().potential_payout(amount)
    }

    /// Retained chat messages, oldest first.
    pub fn chat_history(&self) -> Vec<ChatMessage> {
        lock(&self.chat).feed.messages()
    }
}
