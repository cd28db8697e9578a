use serde::{Deserialize, Serialize};

/// Market mood carried by a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Bull,
    Bear,
    Neutral,
}

/// A simulated trollbox message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    pub user: String,
    pub text: String,
    pub sentiment: Sentiment,
    /// Unix ms
    pub timestamp: i64,
}
