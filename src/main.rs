//! json-echo - HTTP request echo service
//!
//! Reports request metadata as JSON on GET and echoes JSON request
//! bodies back, pretty-printed, for every other method.

use std::net::SocketAddr;

use clap::Parser;
use tokio::net::TcpListener;

mod api;
mod config;
mod error;
mod logging;

use crate::api::build_router;
use crate::config::{CliArgs, Config};

/// Application state shared across handlers. Immutable after startup.
#[derive(Clone)]
pub struct AppState {
    /// Reported as `server_name` in request metadata.
    pub server_name: String,
    /// Address the listener is bound to.
    pub local_addr: Option<SocketAddr>,
    /// Largest request body accepted for echoing.
    pub max_body_bytes: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is expected in production
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: No .env file loaded ({e})");
    }

    let args = CliArgs::parse();

    let config =
        Config::load(&args).map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    logging::init(&config.logging);

    tracing::info!("Starting json-echo v{}", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        max_body_bytes = config.limits.max_body_bytes,
        "Configuration loaded"
    );

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!(address = %addr, error = %e, "Failed to bind listener");
        anyhow::anyhow!("Bind error on {}: {}", addr, e)
    })?;
    let local_addr = listener.local_addr()?;

    let state = AppState {
        server_name: config.server.name.clone(),
        local_addr: Some(local_addr),
        max_body_bytes: config.limits.max_body_bytes,
    };

    let app = build_router(state);

    tracing::info!(address = %local_addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to register SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}
