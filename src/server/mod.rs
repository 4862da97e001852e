//! HTTP interface - `GET /joke` and `GET /health`.

pub mod error;
pub mod handlers;
pub mod state;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::domain::AppConfig;
use crate::infrastructure::{CursorStore, JokeStore};

pub use state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/joke", get(handlers::get_joke))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Ensures the schema exists, binds the listener and serves until Ctrl+C
/// or SIGTERM.
///
/// # Errors
/// Returns error if the database cannot be prepared, the address cannot be
/// bound, or the server fails.
pub async fn run(config: &AppConfig) -> Result<()> {
    JokeStore::open(&config.storage.database_path).with_context(|| {
        format!(
            "failed to prepare database {}",
            config.storage.database_path.display()
        )
    })?;

    let state = AppState::new(
        CursorStore::new(&config.storage.cursor_path),
        config.storage.database_path.clone(),
    );
    let app = build_router(state);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!(
        address = %addr,
        database = %config.storage.database_path.display(),
        cursor = %config.storage.cursor_path.display(),
        "joke server started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("joke server stopped");

    Ok(())
}

/// Resolves once the process is asked to stop. A handler that cannot be
/// installed never fires, so the other one still stops the server.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "ctrl-c",
            Err(err) => {
                tracing::warn!(error = %err, "ctrl-c handler unavailable");
                std::future::pending().await
            }
        }
    };

    let signal = tokio::select! {
        name = ctrl_c => name,
        name = terminate() => name,
    };

    tracing::info!(signal, "stopping joke server");
}

#[cfg(unix)]
async fn terminate() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
            "sigterm"
        }
        Err(err) => {
            tracing::warn!(error = %err, "sigterm handler unavailable");
            std::future::pending().await
        }
    }
}

#[cfg(not(unix))]
async fn terminate() -> &'static str {
    std::future::pending().await
}
