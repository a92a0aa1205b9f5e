//! Test helpers for gateway scenario tests
//!
//! The connection double is the real [`Connection`] around an mpsc channel
//! whose receiving end the test holds; everything a production socket would
//! see arrives there as serialized frames.

use async_trait::async_trait;
use hrlink_common::{AppConfig, AppSettings, Environment, JwtConfig, ServerConfig, SweepConfig};
use hrlink_core::{
    CollabResult, ConnectionId, DomainError, MessageId, MessageStore, NewChatMessage, Role,
    StoredMessage, UserDirectory, UserId,
};
use hrlink_gateway::connection::Connection;
use hrlink_gateway::handlers::FrameRouter;
use hrlink_gateway::protocol::WireFrame;
use hrlink_gateway::server::{create_gateway_state, Collaborators, GatewayState};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// In-memory message store with failure injection.
#[derive(Default)]
pub struct MemoryMessageStore {
    next_id: AtomicI64,
    fail_next: AtomicBool,
    messages: Mutex<HashMap<MessageId, StoredMessage>>,
}

impl MemoryMessageStore {
    /// Make the next storage call fail.
    pub fn fail_next(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        self.fail_next.swap(false, Ordering::SeqCst)
    }

    /// Number of persisted messages.
    pub async fn message_count(&self) -> usize {
        self.messages.lock().await.len()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn persist_chat_message(&self, msg: NewChatMessage) -> CollabResult<StoredMessage> {
        if self.take_failure() {
            return Err(DomainError::StorageError("injected failure".to_string()));
        }

        let id = MessageId::new(self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let stored = StoredMessage {
            id,
            sender_id: msg.sender_id,
            recipient_id: msg.recipient_id,
            body: msg.body,
            read: false,
            sent_at: chrono::Utc::now(),
        };
        self.messages.lock().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn mark_message_read(&self, id: MessageId) -> CollabResult<StoredMessage> {
        if self.take_failure() {
            return Err(DomainError::StorageError("injected failure".to_string()));
        }

        let mut messages = self.messages.lock().await;
        let stored = messages
            .get_mut(&id)
            .ok_or(DomainError::MessageNotFound(id))?;
        stored.read = true;
        Ok(stored.clone())
    }
}

/// Fixed role directory.
#[derive(Default)]
pub struct StaticDirectory {
    roles: HashMap<Role, Vec<UserId>>,
}

impl StaticDirectory {
    #[must_use]
    pub fn with_role(mut self, role: &str, members: &[i64]) -> Self {
        self.roles.insert(
            Role::new(role),
            members.iter().copied().map(UserId::new).collect(),
        );
        self
    }
}

#[async_trait]
impl UserDirectory for StaticDirectory {
    async fn users_by_role(&self, role: &Role) -> CollabResult<Vec<UserId>> {
        Ok(self.roles.get(role).cloned().unwrap_or_default())
    }
}

/// Rejects every token; bootstrap tests construct their own verifier.
struct RejectAll;

#[async_trait]
impl hrlink_core::SessionVerifier for RejectAll {
    async fn verify(&self, _token: &str) -> CollabResult<hrlink_core::UserIdentity> {
        Err(DomainError::InvalidSession)
    }
}

/// Configuration used by every scenario test.
#[must_use]
pub fn test_config() -> AppConfig {
    AppConfig {
        app: AppSettings {
            name: "hrlink-test".to_string(),
            env: Environment::Development,
        },
        gateway: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        jwt: JwtConfig {
            secret: "test-secret".to_string(),
            token_expiry: 900,
        },
        sweep: SweepConfig {
            interval_secs: 1,
            idle_timeout_secs: 1,
        },
    }
}

/// A wired-up gateway with in-memory collaborators.
pub struct TestGateway {
    pub state: GatewayState,
    pub store: Arc<MemoryMessageStore>,
}

impl TestGateway {
    /// Gateway with no roles defined.
    #[must_use]
    pub fn new() -> Self {
        Self::with_directory(StaticDirectory::default())
    }

    /// Gateway with a fixed role directory.
    #[must_use]
    pub fn with_directory(directory: StaticDirectory) -> Self {
        let store = Arc::new(MemoryMessageStore::default());
        let state = create_gateway_state(
            test_config(),
            Collaborators {
                verifier: Arc::new(RejectAll),
                message_store: store.clone(),
                directory: Arc::new(directory),
            },
        );
        Self { state, store }
    }

    /// Register a live connection for a user; the returned receiver plays
    /// the socket writer's role.
    pub fn connect(&self, user: i64) -> (Arc<Connection>, mpsc::Receiver<WireFrame>) {
        let (tx, rx) = mpsc::channel(32);
        let conn = Connection::new(ConnectionId::generate(), UserId::new(user), tx);
        self.state.registry().register(conn.clone());
        (conn, rx)
    }

    /// Push one inbound text frame through the router.
    pub async fn send_frame(&self, connection: &Arc<Connection>, frame: &str) {
        FrameRouter::dispatch(&self.state, connection, frame).await;
    }
}

impl Default for TestGateway {
    fn default() -> Self {
        Self::new()
    }
}

/// Receive one frame and parse it as JSON, with a timeout so a missing
/// delivery fails the test instead of hanging it.
pub async fn recv_event(rx: &mut mpsc::Receiver<WireFrame>) -> serde_json::Value {
    let frame = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for frame")
        .expect("channel closed without a frame");
    serde_json::from_str(frame.as_str()).expect("frame is not valid JSON")
}

/// Assert that no frame is waiting on this connection.
pub fn assert_no_frame(rx: &mut mpsc::Receiver<WireFrame>) {
    assert!(
        rx.try_recv().is_err(),
        "expected no frame, but one was delivered"
    );
}
