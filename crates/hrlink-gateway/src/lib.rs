//! # hrlink-gateway
//!
//! WebSocket gateway for real-time HR workflow notifications and chat.
//!
//! The gateway maps authenticated users to their live connections, routes
//! inbound frames (chat, read receipts, keepalives), and pushes outbound
//! events (notifications, chat messages, receipts) to single users, explicit
//! user sets, or whole roles.

pub mod connection;
pub mod delivery;
pub mod handlers;
pub mod protocol;
pub mod server;

pub use delivery::{DeliveryEngine, Notifier, Target};
pub use server::{run, Collaborators, GatewayState};
