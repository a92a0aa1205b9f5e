//! Value objects - identifier newtypes shared across the application

mod ids;

pub use ids::{ConnectionId, MessageId, Role, UserId};
