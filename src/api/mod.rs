//! HTTP surface
//!
//! `/api/bigquery/get/*` serves the six analytical templates, `/api/db/*`
//! the saved queries and comments.

use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::analytics::Analytics;
use crate::store::QueryStore;

pub mod analytics;
pub mod queries;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub analytics: Arc<dyn Analytics>,
    pub store: Arc<dyn QueryStore>,
}

pub fn create_router(state: AppState) -> Router {
    let bigquery = Router::new()
        .route("/top_terms_day/:country_name/:date", get(analytics::top_terms_day))
        .route(
            "/top_terms_dates/:country_name/:init_date/:finish_date",
            get(analytics::top_terms_dates),
        )
        .route(
            "/top_rising_terms_day/:country_name/:date",
            get(analytics::top_rising_terms_day),
        )
        .route(
            "/top_rising_terms_dates/:country_name/:init_date/:finish_date",
            get(analytics::top_rising_terms_dates),
        )
        .route("/top_terms_interval_dates", get(analytics::top_terms_interval_dates))
        .route(
            "/top_rising_terms_interval_dates",
            get(analytics::top_rising_terms_interval_dates),
        );

    let db = Router::new()
        .route("/post/query", post(queries::create_query))
        .route(
            "/post/comment/:query_id/:username/:comment",
            post(queries::create_comment),
        )
        .route("/get/queries", get(queries::list_queries))
        .route("/get/query/:id", get(queries::get_query))
        .route("/get/comments/:id", get(queries::list_comments));

    Router::new()
        .route("/health", get(health))
        .nest("/api/bigquery/get", bigquery)
        .nest("/api/db", db)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
