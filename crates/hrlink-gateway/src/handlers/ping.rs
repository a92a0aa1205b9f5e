//! Keepalive handler

use super::{HandlerError, HandlerResult};
use crate::connection::Connection;
use crate::protocol::OutboundEvent;
use std::sync::Arc;

/// Handles `ping` frames
pub struct PingHandler;

impl PingHandler {
    /// Answer with a pong on the same connection.
    ///
    /// The router already refreshed last-activity; idle connections that
    /// stop pinging are reclaimed by the sweep.
    pub async fn handle(connection: &Arc<Connection>) -> HandlerResult<()> {
        let frame = OutboundEvent::Pong
            .encode()
            .map_err(|_| HandlerError::PeerWrite)?;

        if connection.send(frame).await.is_err() {
            tracing::warn!(
                connection_id = %connection.id(),
                "Failed to send pong"
            );
            return Err(HandlerError::PeerWrite);
        }

        tracing::trace!(connection_id = %connection.id(), "Pong sent");
        Ok(())
    }
}
