//! Gateway message formats
//!
//! Both directions are closed tagged enums, so adding a message kind is a
//! compile-time-checked change everywhere it is dispatched on.

use chrono::{DateTime, Utc};
use hrlink_core::{MessageId, NotificationKind, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// Inbound frame types the router recognizes.
const INBOUND_TYPES: &[&str] = &["chat_message", "mark_read", "ping"];

/// A message received from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Send a chat message to another user.
    ChatMessage { recipient_id: UserId, body: String },
    /// Mark a previously received message as read.
    MarkRead { message_id: MessageId },
    /// Application-level keepalive.
    Ping,
}

/// An event pushed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundEvent {
    /// A business event (leave approved, payment issued, ...).
    Notification {
        user_id: UserId,
        title: String,
        body: String,
        kind: NotificationKind,
    },
    /// A chat message, delivered to the recipient and echoed to the
    /// sender's other connections.
    ChatMessage {
        id: MessageId,
        sender_id: UserId,
        recipient_id: UserId,
        body: String,
        timestamp: DateTime<Utc>,
    },
    /// The recipient read a message; sent back to the original sender.
    ReadReceipt { message_id: MessageId },
    /// Reply to an inbound ping.
    Pong,
}

impl OutboundEvent {
    /// Serialize to a wire frame.
    ///
    /// The delivery engine calls this once per event and fans the frame out
    /// to every resolved connection.
    pub fn encode(&self) -> Result<WireFrame, serde_json::Error> {
        serde_json::to_string(self).map(|s| WireFrame(Arc::from(s)))
    }
}

/// A serialized outbound frame, cheap to clone across connections.
#[derive(Debug, Clone)]
pub struct WireFrame(Arc<str>);

impl WireFrame {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WireFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of decoding an inbound frame.
#[derive(Debug)]
pub enum DecodedFrame {
    /// A recognized, structurally valid message.
    Message(InboundMessage),
    /// A frame with an unrecognized `type`; ignored for forward compatibility.
    Unknown(String),
}

/// Errors from decoding an inbound frame.
///
/// These never tear the connection down; the router drops the frame and
/// keeps reading.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("frame is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("frame has no string `type` field")]
    MissingType,

    #[error("frame failed validation for type `{frame_type}`: {source}")]
    InvalidPayload {
        frame_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode one inbound text frame.
///
/// Distinguishes unknown `type` values (ignored) from structural failures of
/// a known type (dropped with a warning by the caller).
pub fn decode_frame(text: &str) -> Result<DecodedFrame, FrameError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(FrameError::InvalidJson)?;

    let frame_type = value
        .get("type")
        .and_then(|t| t.as_str())
        .ok_or(FrameError::MissingType)?;

    if !INBOUND_TYPES.contains(&frame_type) {
        return Ok(DecodedFrame::Unknown(frame_type.to_string()));
    }

    let frame_type = frame_type.to_string();
    serde_json::from_value::<InboundMessage>(value)
        .map(DecodedFrame::Message)
        .map_err(|source| FrameError::InvalidPayload { frame_type, source })
}
