//! Outbound delivery
//!
//! [`DeliveryEngine`] resolves a [`Target`] to live connections and pushes a
//! serialized event to each; [`Notifier`] is the convenience surface the
//! workflow handlers call when a business event occurs.

mod engine;
mod notifier;

pub use engine::{DeliveryEngine, Target};
pub use notifier::Notifier;
