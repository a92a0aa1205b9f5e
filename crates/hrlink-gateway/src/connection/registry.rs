//! Connection registry
//!
//! Process-wide mapping from users to live connections, using DashMap for
//! thread-safe access. The registry exclusively owns the mapping; all
//! mutation goes through [`register`](ConnectionRegistry::register) and
//! [`unregister`](ConnectionRegistry::unregister), and returned collections
//! are snapshots.

use super::Connection;
use dashmap::DashMap;
use hrlink_core::{CollabResult, ConnectionId, Role, UserDirectory, UserId};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

/// Process-wide registry of live connections.
pub struct ConnectionRegistry {
    /// Active connections by connection id
    connections: DashMap<ConnectionId, Arc<Connection>>,

    /// User id to connection ids mapping
    user_connections: DashMap<UserId, HashSet<ConnectionId>>,

    /// Directory collaborator for role resolution
    directory: Arc<dyn UserDirectory>,
}

impl ConnectionRegistry {
    /// Create a new registry resolving roles through the given directory.
    #[must_use]
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self {
            connections: DashMap::new(),
            user_connections: DashMap::new(),
            directory,
        }
    }

    /// Create a new registry wrapped in Arc
    #[must_use]
    pub fn new_shared(directory: Arc<dyn UserDirectory>) -> Arc<Self> {
        Arc::new(Self::new(directory))
    }

    /// Register a connection under its owning user.
    ///
    /// Registering an id that is already present replaces the previous
    /// handle silently; only the latest one is retained. That is not
    /// expected under correct bootstrap usage, so it logs a warning.
    pub fn register(&self, connection: Arc<Connection>) {
        let id = connection.id().clone();
        let user_id = connection.user_id();

        if self.connections.insert(id.clone(), connection).is_some() {
            tracing::warn!(
                connection_id = %id,
                user_id = %user_id,
                "Duplicate connection id registered, replacing previous handle"
            );
        }

        self.user_connections
            .entry(user_id)
            .or_default()
            .insert(id.clone());

        tracing::debug!(connection_id = %id, user_id = %user_id, "Connection registered");
    }

    /// Remove a connection.
    ///
    /// Idempotent no-op when the entry is already gone; the close path and
    /// the error path may each call this once. Uses `alter` + `retain` for
    /// atomic modify-and-prune, so no empty per-user set ever lingers.
    pub fn unregister(&self, user_id: UserId, connection_id: &ConnectionId) {
        let removed = self.connections.remove(connection_id).is_some();

        self.user_connections.alter(&user_id, |_, mut ids| {
            ids.remove(connection_id);
            ids
        });
        self.user_connections.retain(|_, ids| !ids.is_empty());

        if removed {
            tracing::debug!(
                connection_id = %connection_id,
                user_id = %user_id,
                "Connection unregistered"
            );
        }
    }

    /// All live connections for a user; empty for unknown users.
    pub fn connections_for(&self, user_id: UserId) -> Vec<Arc<Connection>> {
        self.user_connections
            .get(&user_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.connections.get(id).map(|c| c.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All live connections of users currently holding a role.
    ///
    /// Point-in-time resolution through the directory collaborator; role
    /// membership and online status both change, so nothing is cached.
    pub async fn connections_for_role(&self, role: &Role) -> CollabResult<Vec<Arc<Connection>>> {
        let members = self.directory.users_by_role(role).await?;

        Ok(members
            .into_iter()
            .flat_map(|user_id| self.connections_for(user_id))
            .collect())
    }

    /// Whether a user has at least one live connection
    pub fn is_online(&self, user_id: UserId) -> bool {
        self.user_connections.contains_key(&user_id)
    }

    /// Get the total number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of users with at least one connection
    pub fn user_count(&self) -> usize {
        self.user_connections.len()
    }

    /// Snapshot of connections idle for longer than `threshold`.
    ///
    /// Last-activity is read here, at sweep time, so a connection that
    /// became active after the sweep timer fired is not returned.
    pub async fn idle_connections(&self, threshold: Duration) -> Vec<Arc<Connection>> {
        let snapshot: Vec<Arc<Connection>> =
            self.connections.iter().map(|c| c.value().clone()).collect();

        let mut idle = Vec::new();
        for conn in snapshot {
            if conn.idle_for().await > threshold {
                idle.push(conn);
            }
        }
        idle
    }
}

impl std::fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("connections", &self.connections.len())
            .field("users", &self.user_connections.len())
            .finish()
    }
}
