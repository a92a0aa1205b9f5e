//! Chat message entities
//!
//! The live-delivery layer never owns message durability; these types describe
//! what is handed to and returned by the storage collaborator.

use crate::value_objects::{MessageId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat message about to be persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChatMessage {
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub body: String,
}

impl NewChatMessage {
    #[must_use]
    pub fn new(sender_id: UserId, recipient_id: UserId, body: impl Into<String>) -> Self {
        Self {
            sender_id,
            recipient_id,
            body: body.into(),
        }
    }
}

/// A chat message as persisted by the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: MessageId,
    pub sender_id: UserId,
    pub recipient_id: UserId,
    pub body: String,
    pub read: bool,
    pub sent_at: DateTime<Utc>,
}
