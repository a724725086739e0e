//! Application startup and server initialization.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::collector::create_runner;
use crate::config::ConfigV1;
use crate::routes;
use crate::state::AppState;

/// Builds the shared state for the given configuration.
pub fn build_state(config: Arc<ConfigV1>) -> AppState {
    let collector = create_runner(&config.collector);
    AppState { config, collector }
}

/// Serves the application on an already bound listener until the server stops.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    let app = routes::create_router(state);
    axum::serve(listener, app).await
}

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the configured address cannot be bound or the server
/// fails while running.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let bind_address: SocketAddr = config.bind_address.parse()?;
    let state = build_state(config);

    let listener = TcpListener::bind(bind_address)
        .await
        .map_err(|e| format!("Could not bind to {}: {}", bind_address, e))?;

    info!(
        address = %listener.local_addr()?,
        collector = %state.collector.describe(),
        timeout_ms = state.config.collector.timeout_in_ms,
        "Starting metrics adapter"
    );

    serve(listener, state).await?;
    Ok(())
}
