use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use termlens_db::{ExecutionFailure, WorkerId};
use termlens_query::{Template, TemplateInput};

use termlens::Analytics;

use crate::common::{app_with, get, test_app};

#[tokio::test]
async fn top_terms_day_returns_rows_in_rank_order() {
    let app = test_app();
    app.warehouse.rows(
        &["Top_Term", "rank"],
        vec![
            vec![json!("futbol"), json!("1")],
            vec![json!("clima"), json!("2")],
        ],
    );

    let (status, body) = get(&app.router, "/api/bigquery/get/top_terms_day/Colombia/2024-03-01").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"Top_Term": "futbol", "rank": 1},
            {"Top_Term": "clima", "rank": 2},
        ])
    );

    let seen = app.warehouse.seen();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].query_text().contains("FROM `google_trends.top_terms`"));
    assert_eq!(seen[0].param("date").unwrap().value, "2024-03-01");
    assert_eq!(seen[0].param("country_name").unwrap().value, "Colombia");
}

#[tokio::test]
async fn rising_range_types_percent_gain() {
    let app = test_app();
    app.warehouse.rows(
        &["Day", "Top_Term", "percent_gain"],
        vec![vec![json!("2024-03-05"), json!("eclipse"), json!("4500")]],
    );

    let (status, body) = get(
        &app.router,
        "/api/bigquery/get/top_rising_terms_dates/Mexico/2024-03-01/2024-03-05",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"Day": "2024-03-05", "Top_Term": "eclipse", "percent_gain": 4500.0}])
    );
    let spec = &app.warehouse.seen()[0];
    assert!(spec.query_text().contains("`google_trends.top_rising_terms`"));
    assert!(spec.query_text().ends_with("ORDER BY Day DESC"));
}

#[tokio::test]
async fn empty_result_is_404() {
    let app = test_app();
    app.warehouse.rows(&["Top_Term", "rank"], vec![]);

    let (status, body) = get(&app.router, "/api/bigquery/get/top_rising_terms_day/Atlantis/2099-01-01").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "No data found"}));
}

#[tokio::test]
async fn inverted_and_malformed_ranges_are_not_client_errors() {
    let app = test_app();
    app.warehouse.rows(&["Day", "Top_Term"], vec![]);

    let (status, _) = get(&app.router, "/api/bigquery/get/top_terms_dates/Chile/2024-03-09/2024-03-01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app.router, "/api/bigquery/get/top_terms_dates/Chile/yesterday/today").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let seen = app.warehouse.seen();
    assert_eq!(seen[0].param("init_date").unwrap().value, "2024-03-09");
    assert_eq!(seen[1].param("finish_date").unwrap().value, "today");
}

#[tokio::test]
async fn warehouse_failure_is_500_with_description() {
    let app = test_app();
    app.warehouse
        .respond(Err(ExecutionFailure::new("Quota exceeded: too many queries")));

    let (status, body) = get(&app.router, "/api/bigquery/get/top_terms_interval_dates").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Quota exceeded: too many queries"}));
}

#[tokio::test]
async fn client_creation_failure_is_500() {
    let app = app_with(Some("invalid_grant"));

    let (status, body) = get(&app.router, "/api/bigquery/get/top_rising_terms_interval_dates").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Generic error: invalid_grant"}));
    assert!(app.gateway.pool().is_empty());
}

#[tokio::test]
async fn bounds_return_single_row() {
    let app = test_app();
    app.warehouse.rows(
        &["min_refresh_date", "max_refresh_date"],
        vec![vec![json!("2023-01-01"), json!("2024-03-05")]],
    );

    let (status, body) = get(&app.router, "/api/bigquery/get/top_terms_interval_dates").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([{"min_refresh_date": "2023-01-01", "max_refresh_date": "2024-03-05"}])
    );
    let spec = &app.warehouse.seen()[0];
    assert!(spec.parameters().is_empty());
    assert!(spec.query_text().contains("MIN(refresh_date) AS min_refresh_date"));
}

#[tokio::test]
async fn hostile_path_values_stay_out_of_query_text() {
    let app = test_app();
    app.warehouse.rows(&["Top_Term", "rank"], vec![]);

    get(
        &app.router,
        "/api/bigquery/get/top_terms_day/x'%20OR%20'1'='1/2024-03-01%3B%20DROP%20TABLE%20t",
    )
    .await;

    let spec = &app.warehouse.seen()[0];
    assert_eq!(spec.param("country_name").unwrap().value, "x' OR '1'='1");
    assert_eq!(spec.param("date").unwrap().value, "2024-03-01; DROP TABLE t");
    assert!(!spec.query_text().contains("OR '1'"));
    assert!(!spec.query_text().contains("DROP"));
}

#[tokio::test]
async fn repeated_requests_are_identical() {
    let app = test_app();
    app.warehouse.rows(
        &["Top_Term", "rank"],
        vec![vec![json!("futbol"), json!("1")]],
    );
    let uri = "/api/bigquery/get/top_terms_day/Colombia/2024-03-01";

    let first = get(&app.router, uri).await;
    let second = get(&app.router, uri).await;

    assert_eq!(first, second);
    assert_eq!(app.warehouse.seen().len(), 2);
}

#[tokio::test]
async fn one_client_per_worker() {
    let app = test_app();
    let input = TemplateInput::Bounds;

    for _ in 0..3 {
        app.gateway
            .run(Template::TermsDateBounds, input.clone(), WorkerId::new(1))
            .await
            .unwrap();
    }
    app.gateway
        .run(Template::TermsDateBounds, input, WorkerId::new(2))
        .await
        .unwrap();

    let pool = app.gateway.pool();
    assert_eq!(pool.len(), 2);
    assert_eq!(pool.created(), 2);
    assert_eq!(app.gateway.executor().metrics().total_queries(), 4);
}

#[tokio::test]
async fn health() {
    let app = test_app();
    let (status, body) = get(&app.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
