/**
 * Server Initialization
 *
 * # Startup
 *
 * 1. Load the user store (Postgres or in-memory)
 * 2. Build `AppState`: token keys, Session Authenticator, Connection Hub
 * 3. Build the router
 *
 * # Shutdown
 *
 * `shutdown_signal` resolves on Ctrl-C or SIGTERM after closing every
 * realtime connection, so open sessions end before the server drains.
 */

use axum::Router;

use crate::backend::realtime::hub::ConnectionHub;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_user_store;
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

pub async fn build_state(config: AppConfig) -> AppState {
    tracing::info!("Initializing {} backend server", config.app_name);

    let users = load_user_store(&config).await;
    AppState::new(config, users)
}

pub fn create_app(app_state: AppState) -> Router<()> {
    let app = create_router(app_state);
    tracing::info!("Router configured");
    app
}

/// Wait for a termination signal, then disconnect all realtime clients
pub async fn shutdown_signal(hub: ConnectionHub) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    let closed = hub.disconnect_all();
    tracing::info!("Closed {} realtime connection(s), draining server", closed);
}
