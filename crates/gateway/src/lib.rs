//! API Gateway Library
//!
//! This crate provides the HTTP surface of the board: session endpoints, the
//! access guard, and JSON views over projects, tasks and users kept by the
//! external REST collaborator.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{info, warn};

use remote::RestClient;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Connect the collaborators and serve until Ctrl-C.
pub async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let backend = Arc::new(RestClient::new(&config.remote)?);
    info!("Using REST collaborator at {}", backend.base_url());

    let storage = auth_service_lib::connect_storage(&config.session).await?;
    let addr: SocketAddr = config.address().parse()?;

    let service_name = config.service.service_name.clone();
    let state = AppState::from_backend(backend, storage, config);
    let sessions = state.sessions.clone();
    let app = create_router(state);

    info!(service = %service_name, "Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Err(e) = sessions.teardown().await {
        warn!("Session teardown failed: {}", e);
    }
    info!(service = %service_name, "Stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
