use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Predicted or observed price direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Classify a move from `previous` to `current`. Flat counts as up.
    pub fn of_move(previous: f64, current: f64) -> Self {
        if current >= previous {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "up" | "u" => Ok(Direction::Up),
            "down" | "d" => Ok(Direction::Down),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// A single point on the simulated price series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Unix seconds.
    pub time: i64,
    pub value: f64,
}

impl PriceSample {
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}
