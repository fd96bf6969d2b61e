mod app;
mod auth;
mod config;
mod error;
mod routes;
mod services;
mod state;
mod store;

use tokio::signal;
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = Settings::from_env();
    tracing::info!(
        data_dir = %settings.data_dir.display(),
        static_dir = %settings.static_dir.display(),
        "Loading data store..."
    );
    let state = match AppState::load(&settings).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to load data store");
            return;
        }
    };

    tokio::spawn(services::token_evictor::run(
        state.clone(),
        settings.token_eviction_interval,
    ));

    let app = app::build_app(state);

    let addr = format!("0.0.0.0:{}", settings.port);
    tracing::info!("Bellwether server listening on {addr}");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, %addr, "failed to bind TCP listener");
            return;
        }
    };
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server failed");
    }

    tracing::info!("server stopped");
}

#[cfg(unix)]
async fn sigterm() {
    match signal::unix::signal(signal::unix::SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, waiting for Ctrl+C only");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn sigterm() {
    std::future::pending::<()>().await;
}

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed never
/// fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => "ctrl-c",
            Err(e) => {
                tracing::warn!(error = %e, "Ctrl+C handler unavailable");
                std::future::pending::<&str>().await
            }
        }
    };
    let terminate = async {
        sigterm().await;
        "sigterm"
    };

    let source = tokio::select! {
        source = ctrl_c => source,
        source = terminate => source,
    };
    tracing::info!(signal = source, "shutting down");
}
