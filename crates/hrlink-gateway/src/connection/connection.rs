//! Individual WebSocket connection
//!
//! Represents a single live connection and its activity state. The outbound
//! mpsc sender is the connection's writable seam: the socket writer task
//! drains the receiving end in production, tests hold it directly.

use crate::protocol::WireFrame;
use hrlink_core::{ConnectionId, UserId};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, watch, RwLock};

/// A single live connection, owned by the registry entry it is filed under.
///
/// The owning user is fixed at construction: connections are only created
/// after the upgrade request has been authenticated.
pub struct Connection {
    /// Process-unique connection id
    id: ConnectionId,

    /// Authenticated owner
    user_id: UserId,

    /// Channel to the socket writer task
    sender: mpsc::Sender<WireFrame>,

    /// Close signal observed by the socket tasks
    closed: watch::Sender<bool>,

    /// Last inbound activity (any structurally valid frame)
    last_activity: RwLock<Instant>,

    /// Connection creation time
    created_at: Instant,
}

impl Connection {
    /// Create a new connection around an outbound sender.
    pub fn new(id: ConnectionId, user_id: UserId, sender: mpsc::Sender<WireFrame>) -> Arc<Self> {
        let (closed, _) = watch::channel(false);
        Arc::new(Self {
            id,
            user_id,
            sender,
            closed,
            last_activity: RwLock::new(Instant::now()),
            created_at: Instant::now(),
        })
    }

    /// Get the connection id
    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    /// Get the owning user id
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Record inbound activity
    pub async fn touch(&self) {
        *self.last_activity.write().await = Instant::now();
    }

    /// Time since the last inbound activity
    pub async fn idle_for(&self) -> Duration {
        self.last_activity.read().await.elapsed()
    }

    /// Get connection age
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Send a frame to this connection
    pub async fn send(&self, frame: WireFrame) -> Result<(), mpsc::error::SendError<WireFrame>> {
        self.sender.send(frame).await
    }

    /// Signal the socket tasks to shut this connection down.
    ///
    /// Idempotent; safe to call from the sweep and the cleanup path.
    pub fn close(&self) {
        let _ = self.closed.send(true);
    }

    /// Whether close has been signalled
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    /// Resolve once the connection has been signalled to close.
    pub async fn wait_closed(&self) {
        let mut rx = self.closed.subscribe();
        if *rx.borrow() {
            return;
        }
        while rx.changed().await.is_ok() {
            if *rx.borrow() {
                return;
            }
        }
    }

    /// Check if the outbound channel is closed (writer task gone)
    pub fn is_send_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .finish()
    }
}
