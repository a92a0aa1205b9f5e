//! Chat message handler
//!
//! Persist first, then best-effort live delivery. The two steps are not
//! transactional: a message that persisted but missed its live push is
//! picked up by the recipient's next unread fetch.

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::delivery::Target;
use crate::protocol::OutboundEvent;
use crate::server::GatewayState;
use hrlink_core::{NewChatMessage, UserId};
use std::sync::Arc;

/// Maximum accepted message body length, in characters
const MAX_BODY_CHARS: usize = 4000;

/// Handles `chat_message` frames
pub struct ChatHandler;

impl ChatHandler {
    /// Persist a chat message and push it to the recipient, echoing to the
    /// sender's other connections so multi-tab state stays consistent.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        recipient_id: UserId,
        body: String,
    ) -> HandlerResult<()> {
        if body.is_empty() {
            return Err(HandlerError::Validation("empty message body".to_string()));
        }
        if body.chars().count() > MAX_BODY_CHARS {
            return Err(HandlerError::Validation(format!(
                "message body exceeds {MAX_BODY_CHARS} characters"
            )));
        }

        let sender_id = connection.user_id();

        let stored = state
            .message_store()
            .persist_chat_message(NewChatMessage::new(sender_id, recipient_id, body))
            .await?;

        let event = OutboundEvent::ChatMessage {
            id: stored.id,
            sender_id: stored.sender_id,
            recipient_id: stored.recipient_id,
            body: stored.body,
            timestamp: stored.sent_at,
        };

        let delivered = state
            .delivery()
            .deliver(&Target::user(recipient_id), &event)
            .await;

        // Echo to the sender's other tabs, skipping the originating one
        let echoed = state
            .delivery()
            .deliver_excluding(&Target::user(sender_id), &event, Some(connection.id()))
            .await;

        tracing::trace!(
            message_id = %stored.id,
            sender_id = %sender_id,
            recipient_id = %recipient_id,
            delivered = delivered,
            echoed = echoed,
            "Chat message handled"
        );

        Ok(())
    }
}
