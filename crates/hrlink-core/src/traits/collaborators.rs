//! Collaborator traits (ports) - the gateway's view of the rest of the app
//!
//! The real-time core only ever touches persistence, the user directory, and
//! session verification through these traits. The surrounding application
//! provides the implementations; tests provide in-memory doubles.

use async_trait::async_trait;

use crate::entities::{NewChatMessage, StoredMessage, UserIdentity};
use crate::error::DomainError;
use crate::value_objects::{MessageId, Role, UserId};

/// Result type for collaborator operations
pub type CollabResult<T> = Result<T, DomainError>;

// ============================================================================
// Session verification
// ============================================================================

/// Verifies a session token presented with a connection upgrade.
///
/// Called before any connection state is allocated; a failed verification
/// refuses the upgrade outright.
#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Verify a raw token and return the identity it belongs to.
    async fn verify(&self, token: &str) -> CollabResult<UserIdentity>;
}

// ============================================================================
// Message storage
// ============================================================================

/// Persists chat messages and read state.
///
/// Durability lives here; the live-delivery layer is best-effort on top.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a new chat message, returning the stored record.
    async fn persist_chat_message(&self, msg: NewChatMessage) -> CollabResult<StoredMessage>;

    /// Mark a message as read, returning the updated record.
    async fn mark_message_read(&self, id: MessageId) -> CollabResult<StoredMessage>;
}

// ============================================================================
// User directory
// ============================================================================

/// Resolves role tags to user identifiers.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All users currently holding the given role.
    ///
    /// Role membership changes over time; results must not be cached.
    async fn users_by_role(&self, role: &Role) -> CollabResult<Vec<UserId>>;
}
