use thiserror::Error;

/// Reasons a wager placement is rejected.
///
/// A rejected placement never touches the balance or the wager list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WagerError {
    #[error("Insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("Invalid wager amount: {0}")]
    InvalidAmount(f64),
}

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Wager(#[from] WagerError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Simulation engine is stopped")]
    EngineStopped,

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl AppError {
    /// Whether the caller can retry with different input.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Wager(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_funds_message() {
        let err = WagerError::InsufficientFunds {
            needed: 250.0,
            available: 100.0,
        };
        assert_eq!(err.to_string(), "Insufficient funds: need 250, have 100");
    }

    #[test]
    fn test_wager_error_converts_to_app_error() {
        let err: AppError = WagerError::InvalidAmount(-5.0).into();
        assert!(matches!(err, AppError::Wager(WagerError::InvalidAmount(_))));
        assert!(err.is_recoverable());
        assert!(!AppError::EngineStopped.is_recoverable());
    }
}
