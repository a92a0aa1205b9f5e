//! Read receipt handler

use super::HandlerResult;
use crate::connection::Connection;
use crate::delivery::Target;
use crate::protocol::OutboundEvent;
use crate::server::GatewayState;
use hrlink_core::MessageId;
use std::sync::Arc;

/// Handles `mark_read` frames
pub struct ReadReceiptHandler;

impl ReadReceiptHandler {
    /// Persist the read state and push a receipt to the original sender.
    ///
    /// An unknown message id surfaces as a persistence failure; no receipt
    /// is emitted and the connection stays open.
    pub async fn handle(
        state: &GatewayState,
        connection: &Arc<Connection>,
        message_id: MessageId,
    ) -> HandlerResult<()> {
        let stored = state.message_store().mark_message_read(message_id).await?;

        let delivered = state
            .delivery()
            .deliver(
                &Target::user(stored.sender_id),
                &OutboundEvent::ReadReceipt {
                    message_id: stored.id,
                },
            )
            .await;

        tracing::trace!(
            message_id = %message_id,
            reader_id = %connection.user_id(),
            sender_id = %stored.sender_id,
            delivered = delivered,
            "Read receipt handled"
        );

        Ok(())
    }
}
