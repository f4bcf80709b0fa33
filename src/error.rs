use crate::store::{StoreError, ValidationErrors};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors of the relational endpoints.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("Query {0} not found")]
    NotFound(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (StatusCode::BAD_REQUEST, Json(errors)).into_response(),
            ApiError::NotFound(id) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "error": format!("Query {} not found", id) })),
            )
                .into_response(),
            ApiError::Store(err @ StoreError::UnknownQuery(_)) => {
                let errors = ValidationErrors::single("query", err.to_string());
                (StatusCode::BAD_REQUEST, Json(errors)).into_response()
            }
            ApiError::Store(err) => {
                error!(error = %err, "store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": err.to_string() })),
                )
                    .into_response()
            }
        }
    }
}
