//! Chat assistant payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Sender;

/// A message in the active chat session. Ids are assigned locally and are
/// only unique within one session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
    #[serde(default)]
    pub is_error: bool,
}

/// Response of `POST /chat/start/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatSession {
    pub session_id: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// Response of `POST /chat/message/`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}
