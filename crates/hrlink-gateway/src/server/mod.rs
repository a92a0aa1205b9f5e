//! Gateway server setup
//!
//! Wires the registry, delivery engine, and collaborators into an axum app
//! with the `/gateway` upgrade endpoint and the idle-connection sweep.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::connection::ConnectionRegistry;
use axum::{routing::get, Router};
use hrlink_common::{AppConfig, AppError};
use hrlink_core::{MessageStore, SessionVerifier, UserDirectory};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;

/// External collaborators injected at process startup.
pub struct Collaborators {
    pub verifier: Arc<dyn SessionVerifier>,
    pub message_store: Arc<dyn MessageStore>,
    pub directory: Arc<dyn UserDirectory>,
}

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Construct the dependency-injected gateway state.
///
/// This is the single initialization point for the registry; everything else
/// receives it through [`GatewayState`].
pub fn create_gateway_state(config: AppConfig, collaborators: Collaborators) -> GatewayState {
    let registry = ConnectionRegistry::new_shared(collaborators.directory);

    GatewayState::new(
        registry,
        collaborators.verifier,
        collaborators.message_store,
        config,
    )
}

/// Spawn the idle-connection sweep.
///
/// Runs on a fixed interval regardless of connection activity; each pass
/// takes a fresh last-activity snapshot, so connections active since the
/// timer fired are left alone. Closed connections then run the normal
/// cleanup path in their socket task.
pub fn spawn_idle_sweep(state: GatewayState) -> JoinHandle<()> {
    let interval = Duration::from_secs(state.config().sweep.interval_secs);
    let threshold = Duration::from_secs(state.config().sweep.idle_timeout_secs);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let idle = state.registry().idle_connections(threshold).await;
            for conn in idle {
                let idle_for_secs = conn.idle_for().await.as_secs();
                tracing::info!(
                    connection_id = %conn.id(),
                    user_id = %conn.user_id(),
                    idle_for_secs,
                    "Closing idle connection"
                );
                conn.close();
            }
        }
    })
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    tracing::info!("Starting gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/gateway", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration and collaborators
pub async fn run(config: AppConfig, collaborators: Collaborators) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .gateway
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid gateway address: {e}")))?;

    // Create gateway state
    let state = create_gateway_state(config, collaborators);

    // Start the idle sweep
    spawn_idle_sweep(state.clone());

    // Build application
    let app = create_app(state);

    // Run server
    run_server(app, addr).await
}
