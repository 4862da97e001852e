use axum::{extract::State, Json};
use serde::Serialize;

use super::{error::ApiError, state::AppState};
use crate::application::next_joke;
use crate::domain::Joke;
use crate::infrastructure::JokeStore;

#[derive(Debug, Serialize)]
pub struct HealthBody {
    status: &'static str,
}

pub async fn health() -> Json<HealthBody> {
    Json(HealthBody { status: "ok" })
}

/// `GET /joke`: serves the next joke in rotation.
///
/// The rotation is blocking file and `SQLite` work, so it runs on the
/// blocking pool with a connection of its own.
pub async fn get_joke(State(state): State<AppState>) -> Result<Json<Joke>, ApiError> {
    let joke = tokio::task::spawn_blocking(move || {
        let store = JokeStore::open(&state.database_path)?;
        next_joke(&state.cursor, &store)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Rotation task panicked or was cancelled");
        ApiError::Internal
    })??;

    tracing::info!(joke_id = joke.id, "Served joke");

    Ok(Json(joke))
}
