//! Delivery engine
//!
//! Best-effort fan-out of outbound events to currently-open connections.
//! At-most-once per connection per call; offline targets receive nothing and
//! are backfilled by their next unread-state fetch on reconnect.

use crate::connection::{Connection, ConnectionRegistry};
use crate::protocol::OutboundEvent;
use hrlink_core::{ConnectionId, Role, UserId};
use std::collections::HashSet;
use std::sync::Arc;

/// Delivery scope: one user, an explicit set, or everyone holding a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    User(UserId),
    Users(Vec<UserId>),
    Role(Role),
}

impl Target {
    #[must_use]
    pub fn user(id: UserId) -> Self {
        Self::User(id)
    }

    #[must_use]
    pub fn users(ids: Vec<UserId>) -> Self {
        Self::Users(ids)
    }

    #[must_use]
    pub fn role(role: Role) -> Self {
        Self::Role(role)
    }
}

/// Pushes serialized events to the connections a target resolves to.
pub struct DeliveryEngine {
    registry: Arc<ConnectionRegistry>,
}

impl DeliveryEngine {
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver an event to every connection the target currently resolves to.
    ///
    /// Returns the number of successful writes. Zero live connections is the
    /// expected offline case, not an error.
    pub async fn deliver(&self, target: &Target, event: &OutboundEvent) -> usize {
        self.deliver_excluding(target, event, None).await
    }

    /// Deliver, skipping one connection (the sender echo case).
    pub async fn deliver_excluding(
        &self,
        target: &Target,
        event: &OutboundEvent,
        exclude: Option<&ConnectionId>,
    ) -> usize {
        let connections = self.resolve(target).await;
        if connections.is_empty() {
            tracing::trace!(target = ?target, "Delivery target offline, nothing to push");
            return 0;
        }

        // Serialize once, fan the frame out
        let frame = match event.encode() {
            Ok(frame) => frame,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize outbound event");
                return 0;
            }
        };

        let mut sent = 0;
        for conn in connections {
            if exclude == Some(conn.id()) {
                continue;
            }

            if conn.send(frame.clone()).await.is_ok() {
                sent += 1;
            } else {
                // Half-closed peer: evict it and keep delivering to the rest
                tracing::warn!(
                    connection_id = %conn.id(),
                    user_id = %conn.user_id(),
                    "Write to connection failed, unregistering"
                );
                self.registry.unregister(conn.user_id(), conn.id());
                conn.close();
            }
        }

        tracing::trace!(target = ?target, sent = sent, "Event delivered");
        sent
    }

    /// Resolve a target to a snapshot of live connections.
    ///
    /// Union semantics for multi-user and role targets; duplicate user ids
    /// collapse so no connection is written twice in one call.
    async fn resolve(&self, target: &Target) -> Vec<Arc<Connection>> {
        match target {
            Target::User(user_id) => self.registry.connections_for(*user_id),
            Target::Users(ids) => {
                let unique: HashSet<UserId> = ids.iter().copied().collect();
                unique
                    .into_iter()
                    .flat_map(|id| self.registry.connections_for(id))
                    .collect()
            }
            Target::Role(role) => match self.registry.connections_for_role(role).await {
                Ok(conns) => conns,
                Err(e) => {
                    // Directory failure degrades to an offline target
                    tracing::warn!(role = %role, error = %e, "Role resolution failed, skipping delivery");
                    Vec::new()
                }
            },
        }
    }
}

impl std::fmt::Debug for DeliveryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryEngine")
            .field("registry", &self.registry)
            .finish()
    }
}
