use std::process::ExitCode;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod tts;

use api::routes::{create_router, AppState};
use config::Config;
use tts::TtsClient;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    tracing::info!("Voice Relay v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Starting server on http://{}", config.addr);
    tracing::info!("Static directory: {}", config.static_dir.display());

    let tts = TtsClient::from_config(&config)?;
    tracing::info!(
        "Upstream: {} (model {}, timeout {}s)",
        tts.base_url(),
        config.model_id,
        config.upstream_timeout.as_secs()
    );

    let state = Arc::new(AppState { tts });
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| format!("Failed to bind to {}: {}", config.addr, e))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
