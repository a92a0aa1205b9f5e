//! Authenticated user identity

use crate::value_objects::{Role, UserId};
use serde::{Deserialize, Serialize};

/// Identity attached to a verified session.
///
/// Produced by the auth collaborator at upgrade time; the gateway never
/// consults user storage directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

impl UserIdentity {
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            roles: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_roles(mut self, roles: Vec<Role>) -> Self {
        self.roles = roles;
        self
    }

    /// Check whether this identity carries a role.
    #[must_use]
    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }
}
