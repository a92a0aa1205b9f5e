//! Domain entities

mod message;
mod notification;
mod user;

pub use message::{NewChatMessage, StoredMessage};
pub use notification::NotificationKind;
pub use user::UserIdentity;
