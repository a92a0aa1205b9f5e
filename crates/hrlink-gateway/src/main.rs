//! Gateway server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p hrlink-gateway
//! ```
//!
//! Configuration is loaded from environment variables. The binary wires in
//! the JWT session verifier plus in-memory storage/directory stand-ins; the
//! full application replaces those with its own collaborators when it embeds
//! the gateway.

use async_trait::async_trait;
use hrlink_common::{try_init_tracing, AppConfig, JwtService, JwtSessionVerifier};
use hrlink_core::{
    CollabResult, DomainError, MessageId, MessageStore, NewChatMessage, Role, StoredMessage,
    UserDirectory, UserId,
};
use hrlink_gateway::Collaborators;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    // Run the server
    if let Err(e) = run().await {
        error!(error = %e, "Gateway failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting hrlink gateway...");

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.gateway.port,
        "Configuration loaded"
    );

    let verifier = Arc::new(JwtSessionVerifier::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.token_expiry,
    )));

    let collaborators = Collaborators {
        verifier,
        message_store: Arc::new(MemoryMessageStore::default()),
        directory: Arc::new(EnvDirectory::from_env()),
    };

    // Run the gateway server
    hrlink_gateway::run(config, collaborators).await?;

    Ok(())
}

/// In-memory message store stand-in for running the gateway on its own.
#[derive(Default)]
struct MemoryMessageStore {
    next_id: AtomicI64,
    messages: Mutex<HashMap<MessageId, StoredMessage>>,
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn persist_chat_message(&self, msg: NewChatMessage) -> CollabResult<StoredMessage> {
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
        let mut messages = self.messages.lock().await;
        let stored = messages
            .get_mut(&id)
            .ok_or(DomainError::MessageNotFound(id))?;
        stored.read = true;
        Ok(stored.clone())
    }
}

/// Role directory stand-in, configured via `GATEWAY_ROLES`
/// (e.g. `hr=1,2,3;manager=4`).
struct EnvDirectory {
    roles: HashMap<Role, Vec<UserId>>,
}

impl EnvDirectory {
    fn from_env() -> Self {
        let mut roles = HashMap::new();
        if let Ok(raw) = std::env::var("GATEWAY_ROLES") {
            for entry in raw.split(';').filter(|s| !s.is_empty()) {
                if let Some((role, members)) = entry.split_once('=') {
                    let users = members
                        .split(',')
                        .filter_map(|id| id.trim().parse::<i64>().ok())
                        .map(UserId::new)
                        .collect();
                    roles.insert(Role::new(role.trim()), users);
                }
            }
        }
        Self { roles }
    }
}

#[async_trait]
impl UserDirectory for EnvDirectory {
    async fn users_by_role(&self, role: &Role) -> CollabResult<Vec<UserId>> {
        Ok(self.roles.get(role).cloned().unwrap_or_default())
    }
}
