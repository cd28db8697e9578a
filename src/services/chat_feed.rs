//! Simulated trollbox feed.
//!
//! Unrelated to price or wager state; it only needs a random source and a
//! timestamp.

use crate::services::random::RandomSource;
use crate::types::{ChatMessage, Sentiment};
use std::collections::VecDeque;

/// Handles that post in the feed.
const USER_HANDLES: &[&str] = &[
    "CryptoKing",
    "SatoshiFan",
    "MoonWalker",
    "BearMarketBob",
    "AlphaSeeker",
    "WhaleWatcher",
];

/// Message catalog with the mood each line carries.
const MESSAGES: &[(&str, Sentiment)] = &[
    ("BTC breaking resistance!", Sentiment::Bull),
    ("Shorting this top, way overbought.", Sentiment::Bear),
    ("Anyone watching ETH?", Sentiment::Neutral),
    ("LFG!!! 🚀", Sentiment::Bull),
    ("Careful with the leverage guys.", Sentiment::Neutral),
    ("Dumping incoming...", Sentiment::Bear),
    ("Green candle confirmed.", Sentiment::Bull),
];

/// Bounded history of generated chat messages.
#[derive(Debug, Clone)]
pub struct ChatFeed {
    messages: VecDeque<ChatMessage>,
    capacity: usize,
}

impl ChatFeed {
    /// Create an empty feed keeping at most `capacity` messages.
    pub fn new(capacity: usize) -> Self {
        Self {
            messages: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Generate one message, keep it, and return it.
    pub fn next_message(&mut self, rng: &mut dyn RandomSource, now: i64) -> ChatMessage {
        let user = USER_HANDLES[rng.pick_index(USER_HANDLES.len())];
        let (text, sentiment) = MESSAGES[rng.pick_index(MESSAGES.len())];

        let message = ChatMessage {
            id: uuid::Uuid::new_v4().to_string(),
            user: user.to_string(),
            text: text.to_string(),
            sentiment,
            timestamp: now,
        };

        self.messages.push_back(message.clone());
        while self.messages.len() > self.capacity {
            self.messages.pop_front();
        }

        message
    }

    /// Retained messages, oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.iter().cloned().collect()
    }

    /// Get the number of retained messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the feed has no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::random::SequenceSource;

    #[test]
    fn test_picks_from_catalog() {
        let mut feed = ChatFeed::new(30);
        let mut rng = SequenceSource::new(vec![0.0, 0.0]);

        let msg = feed.next_message(&mut rng, 42);
        assert_eq!(msg.user, "CryptoKing");
        assert_eq!(msg.text, "BTC breaking resistance!");
        assert_eq!(msg.sentiment, Sentiment::Bull);
        assert_eq!(msg.timestamp, 42);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut feed = ChatFeed::new(30);
        let mut rng = SequenceSource::new(vec![0.3, 0.7, 0.9]);

        let mut last_id = String::new();
        for i in 0..45 {
            last_id = feed.next_message(&mut rng, i).id;
        }

        assert_eq!(feed.len(), 30);
        let messages = feed.messages();
        assert_eq!(messages.first().map(|m| m.timestamp), Some(15));
        assert_eq!(messages.last().map(|m| m.id.clone()), Some(last_id));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut feed = ChatFeed::new(10);
        let mut rng = SequenceSource::constant(0.5);
        let a = feed.next_message(&mut rng, 0);
        let b = feed.next_message(&mut rng, 0);
        assert_ne!(a.id, b.id);
    }
}
