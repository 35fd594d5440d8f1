/**
 * ScrapyFlow Server Entry Point
 *
 * Loads configuration, initializes tracing, and serves the backend with
 * graceful shutdown.
 */

use scrapyflow::backend::server::{build_state, create_app, shutdown_signal};
use scrapyflow::shared::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("Loaded configuration: {:?}", config);
    let port = config.server_port;

    let state = build_state(config).await;
    let hub = state.hub.clone();
    let app = create_app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(hub))
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
