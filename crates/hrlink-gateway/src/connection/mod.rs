//! Connection management
//!
//! [`Connection`] owns the outbound seam for one live socket;
//! [`ConnectionRegistry`] is the process-wide map from users to their
//! connections.

mod connection;
mod registry;

pub use connection::Connection;
pub use registry::ConnectionRegistry;
