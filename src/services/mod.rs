pub mod chat_feed;
pub mod clock;
pub mod engine;
pub mod ledger;
pub mod orderbook;
pub mod price_generator;
pub mod random;
pub mod scheduler;
pub mod series_window;
pub mod simulation;

pub use chat_feed::ChatFeed;
pub use clock::{Clock, ManualClock, SessionClock};
pub use engine::SimulationEngine;
pub use ledger::{settle_matured, LedgerConfig, WagerLedger};
pub use orderbook::{OrderBookConfig, OrderBookSynthesizer};
pub use price_generator::PriceGenerator;
pub use random::{RandomSource, RngSource, SequenceSource};
pub use scheduler::IntervalScheduler;
pub use series_window::{PushOutcome, SeriesWindow};
pub use simulation::Simulation;
