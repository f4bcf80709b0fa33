use axum::http::StatusCode;
use serde_json::{json, Value};
use termlens_db::{ExecutionFailure, ResultSet};

pub const NO_DATA_FOUND: &str = "No data found";

pub type QueryOutcome = Result<ResultSet, ExecutionFailure>;

/// Map one analytical outcome to its response: rows are 200, an empty result
/// is 404 and a warehouse failure is 500.
pub fn normalize(outcome: QueryOutcome) -> (StatusCode, Value) {
    match outcome {
        Err(failure) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({ "error": failure.message() }),
        ),
        Ok(rows) if rows.is_empty() => (StatusCode::NOT_FOUND, json!({ "error": NO_DATA_FOUND })),
        Ok(rows) => (
            StatusCode::OK,
            Value::Array(rows.into_iter().map(Value::Object).collect()),
        ),
    }
}
