//! Saved query and comment endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use tracing::info;

use super::AppState;
use crate::error::ApiError;
use crate::store::{Comment, NewComment, NewQueryRequest, QuerySummary, SavedQuery};

fn saved() -> (StatusCode, Json<Value>) {
    (
        StatusCode::CREATED,
        Json(json!({ "message": "Data saved successfully" })),
    )
}

pub async fn create_query(
    State(state): State<AppState>,
    Json(body): Json<NewQueryRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new = body.validate()?;
    let query = state.store.create_query(new).await?;
    info!(id = query.id, username = %query.username, "saved query");
    Ok(saved())
}

pub async fn create_comment(
    State(state): State<AppState>,
    Path((query_id, username, comment)): Path<(String, String, String)>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let new = NewComment::parse(&query_id, &username, &comment)?;
    let comment = state.store.create_comment(new).await?;
    info!(id = comment.id, query = comment.query, "saved comment");
    Ok(saved())
}

pub async fn list_queries(State(state): State<AppState>) -> Result<Json<Vec<QuerySummary>>, ApiError> {
    Ok(Json(state.store.list_queries().await?))
}

pub async fn get_query(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SavedQuery>, ApiError> {
    state
        .store
        .get_query(id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound(id))
}

pub async fn list_comments(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Comment>>, ApiError> {
    Ok(Json(state.store.list_comments(id).await?))
}
