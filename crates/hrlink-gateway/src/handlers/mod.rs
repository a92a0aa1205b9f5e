//! Frame handlers
//!
//! Routes decoded inbound messages to the matching handler. A connection
//! stays OPEN across bad frames; only socket close/error ends it.

mod chat;
mod error;
mod ping;
mod read;

pub use chat::ChatHandler;
pub use error::{HandlerError, HandlerResult};
pub use ping::PingHandler;
pub use read::ReadReceiptHandler;

use crate::connection::Connection;
use crate::protocol::{decode_frame, DecodedFrame, InboundMessage};
use crate::server::GatewayState;
use std::sync::Arc;

/// Dispatch inbound text frames to the appropriate handler.
pub struct FrameRouter;

impl FrameRouter {
    /// Handle one inbound text frame.
    ///
    /// All failure modes are recovered locally: unknown frame types are
    /// ignored, malformed frames are dropped with a warning, and handler
    /// errors (persistence, peer writes) are logged. Nothing here tears the
    /// connection down.
    pub async fn dispatch(state: &GatewayState, connection: &Arc<Connection>, text: &str) {
        let message = match decode_frame(text) {
            Ok(DecodedFrame::Message(message)) => message,
            Ok(DecodedFrame::Unknown(frame_type)) => {
                tracing::debug!(
                    connection_id = %connection.id(),
                    frame_type = %frame_type,
                    "Ignoring unknown frame type"
                );
                return;
            }
            Err(e) => {
                tracing::warn!(
                    connection_id = %connection.id(),
                    user_id = %connection.user_id(),
                    error = %e,
                    "Dropping malformed frame"
                );
                return;
            }
        };

        // Any structurally valid frame counts as activity
        connection.touch().await;

        let result = match message {
            InboundMessage::ChatMessage { recipient_id, body } => {
                ChatHandler::handle(state, connection, recipient_id, body).await
            }
            InboundMessage::MarkRead { message_id } => {
                ReadReceiptHandler::handle(state, connection, message_id).await
            }
            InboundMessage::Ping => PingHandler::handle(connection).await,
        };

        if let Err(e) = result {
            tracing::warn!(
                connection_id = %connection.id(),
                user_id = %connection.user_id(),
                error = %e,
                "Frame handling failed, connection stays open"
            );
        }
    }
}
