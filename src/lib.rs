//! Arena - simulated price feed with timed up/down wager settlement

pub mod config;
pub mod error;
pub mod input;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result, WagerError};
pub use services::SimulationEngine;
