//! WebSocket handler
//!
//! Session bootstrap: the upgrade request is authenticated BEFORE the socket
//! is accepted. An unauthenticated attempt is refused at the HTTP level and
//! never allocates a connection, a registry entry, or a frame loop.

use crate::connection::Connection;
use crate::handlers::FrameRouter;
use crate::protocol::WireFrame;
use crate::server::GatewayState;
use axum::{
    extract::{ws::Message, Query, State, WebSocketUpgrade},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use hrlink_core::{ConnectionId, UserIdentity};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Channel buffer size for outgoing frames
const MESSAGE_BUFFER_SIZE: usize = 100;

/// Query parameters accepted on the upgrade request
#[derive(Debug, Deserialize)]
pub struct UpgradeParams {
    /// Session token; browsers cannot set headers on WebSocket requests
    token: Option<String>,
}

/// WebSocket gateway handler
pub async fn gateway_handler(
    State(state): State<GatewayState>,
    Query(params): Query<UpgradeParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let token = params.token.or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    });

    let Some(token) = token else {
        tracing::debug!("Gateway upgrade without token refused");
        return StatusCode::UNAUTHORIZED.into_response();
    };

    match state.session_verifier().verify(&token).await {
        Ok(identity) => {
            ws.on_upgrade(move |socket| handle_socket(state, socket, identity))
        }
        Err(e) => {
            tracing::debug!(error = %e, "Gateway upgrade with invalid session refused");
            StatusCode::UNAUTHORIZED.into_response()
        }
    }
}

/// Handle an upgraded, authenticated WebSocket connection
async fn handle_socket(
    state: GatewayState,
    socket: axum::extract::ws::WebSocket,
    identity: UserIdentity,
) {
    let connection_id = ConnectionId::generate();

    // Create frame channel for outgoing messages
    let (tx, mut rx) = mpsc::channel::<WireFrame>(MESSAGE_BUFFER_SIZE);

    // Construct and register the connection; identity was verified above
    let connection = Connection::new(connection_id.clone(), identity.id, tx);
    state.registry().register(connection.clone());

    tracing::info!(
        connection_id = %connection_id,
        user_id = %identity.id,
        username = %identity.username,
        connections = state.registry().connection_count(),
        "WebSocket connection established"
    );

    // Split the WebSocket
    let (mut ws_sink, mut ws_stream) = socket.split();

    // Clone for the receive task
    let state_recv = state.clone();
    let connection_recv = connection.clone();

    // Task reading frames from the socket, FIFO per connection
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = ws_stream.next().await {
            match msg {
                Ok(Message::Text(text)) => {
                    FrameRouter::dispatch(&state_recv, &connection_recv, &text).await;
                }
                Ok(Message::Binary(_)) => {
                    // Binary frames are not part of the wire contract
                    tracing::debug!(
                        connection_id = %connection_recv.id(),
                        "Dropping unsupported binary frame"
                    );
                }
                Ok(Message::Ping(_)) => {
                    // Pong is handled automatically by axum
                    connection_recv.touch().await;
                }
                Ok(Message::Pong(_)) => {
                    tracing::trace!(connection_id = %connection_recv.id(), "Pong received");
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(
                        connection_id = %connection_recv.id(),
                        "Client closed connection"
                    );
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        connection_id = %connection_recv.id(),
                        error = %e,
                        "WebSocket error"
                    );
                    return;
                }
            }
        }
    });

    // Clone for the send task
    let connection_id_send = connection_id.clone();

    // Task draining the outbound channel into the socket
    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if ws_sink
                .send(Message::Text(frame.as_str().to_owned()))
                .await
                .is_err()
            {
                tracing::warn!(
                    connection_id = %connection_id_send,
                    "Failed to write frame to WebSocket"
                );
                break;
            }
        }

        // Close the WebSocket when the channel is closed
        let _ = ws_sink.close().await;
    });

    // Run until the socket ends on either side or the sweep closes us
    tokio::select! {
        _ = &mut recv_task => {}
        _ = &mut send_task => {}
        () = connection.wait_closed() => {
            tracing::debug!(connection_id = %connection_id, "Connection close signalled");
        }
    }

    // Single cleanup path: exactly one unregister per connection lifetime
    cleanup_connection(&state, &connection);
    recv_task.abort();
    send_task.abort();
}

/// Clean up a connection on disconnect
fn cleanup_connection(state: &GatewayState, connection: &Arc<Connection>) {
    connection.close();
    state
        .registry()
        .unregister(connection.user_id(), connection.id());

    tracing::info!(
        connection_id = %connection.id(),
        user_id = %connection.user_id(),
        connections = state.registry().connection_count(),
        "Connection cleaned up"
    );
}
