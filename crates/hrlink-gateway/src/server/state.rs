//! Gateway state
//!
//! Dependency-injected shared state. All components reach the registry,
//! delivery engine, and collaborators through this one constructed instance;
//! there is no ambient singleton.

use crate::connection::ConnectionRegistry;
use crate::delivery::{DeliveryEngine, Notifier};
use hrlink_common::AppConfig;
use hrlink_core::{MessageStore, SessionVerifier};
use std::sync::Arc;

/// Gateway application state
#[derive(Clone)]
pub struct GatewayState {
    /// Registry of live connections
    registry: Arc<ConnectionRegistry>,
    /// Outbound delivery engine
    delivery: Arc<DeliveryEngine>,
    /// Auth collaborator, consulted before every upgrade
    verifier: Arc<dyn SessionVerifier>,
    /// Storage collaborator for chat messages and read state
    message_store: Arc<dyn MessageStore>,
    /// Application configuration
    config: Arc<AppConfig>,
}

impl GatewayState {
    /// Create a new gateway state
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        verifier: Arc<dyn SessionVerifier>,
        message_store: Arc<dyn MessageStore>,
        config: AppConfig,
    ) -> Self {
        let delivery = Arc::new(DeliveryEngine::new(registry.clone()));
        Self {
            registry,
            delivery,
            verifier,
            message_store,
            config: Arc::new(config),
        }
    }

    /// Get the connection registry
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Get the delivery engine
    pub fn delivery(&self) -> &DeliveryEngine {
        &self.delivery
    }

    /// Delivery engine handle for notification-producing collaborators
    pub fn delivery_handle(&self) -> Arc<DeliveryEngine> {
        self.delivery.clone()
    }

    /// Notification surface for workflow handlers
    pub fn notifier(&self) -> Notifier {
        Notifier::new(self.delivery.clone())
    }

    /// Get the session verifier
    pub fn session_verifier(&self) -> &dyn SessionVerifier {
        self.verifier.as_ref()
    }

    /// Get the message store
    pub fn message_store(&self) -> &dyn MessageStore {
        self.message_store.as_ref()
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState")
            .field("registry", &self.registry)
            .field("config", &"AppConfig")
            .finish()
    }
}
