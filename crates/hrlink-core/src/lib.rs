//! # hrlink-core
//!
//! Domain layer containing identifiers, entities, and collaborator traits.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{NewChatMessage, NotificationKind, StoredMessage, UserIdentity};
pub use error::DomainError;
pub use traits::{CollabResult, MessageStore, SessionVerifier, UserDirectory};
pub use value_objects::{ConnectionId, MessageId, Role, UserId};
