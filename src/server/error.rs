//! HTTP error mapping.
//!
//! Every failure is a 500 with `{"error": "..."}`. Database details are
//! logged here and never reach the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::application::RotationError;

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Rotation(#[from] RotationError),

    #[error("internal server error")]
    Internal,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::Rotation(RotationError::Database(source)) => {
                tracing::error!(error = %source, "Database query failed");
            }
            Self::Rotation(err) => tracing::warn!(error = %err, "No joke served"),
            Self::Internal => tracing::error!("Request task failed"),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
