use axum::http::StatusCode;
use maplit::btreemap;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::common::{get, post, post_json, test_app};

fn query_body(name: &str) -> Value {
    json!({
        "query": "SELECT term FROM top_terms",
        "name": name,
        "username": "ana",
        "query_comment": "daily check",
    })
}

#[tokio::test]
async fn save_and_read_queries() {
    let app = test_app();

    let (status, body) = post_json(&app.router, "/api/db/post/query", query_body("daily")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "Data saved successfully"}));
    post_json(&app.router, "/api/db/post/query", query_body("weekly")).await;

    let (status, body) = get(&app.router, "/api/db/get/queries").await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[1]["name"], "weekly");
    let keys: Vec<_> = list[0].as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["id", "name", "username", "date"]);

    let (status, body) = get(&app.router, "/api/db/get/query/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "SELECT term FROM top_terms");
    assert_eq!(body["query_comment"], "daily check");
    assert!(body["date"].as_str().unwrap().len() == "2024-03-01".len());
}

#[tokio::test]
async fn invalid_query_reports_fields() {
    let app = test_app();

    let (status, body) = post_json(
        &app.router,
        "/api/db/post/query",
        json!({"query": "SELECT 1", "name": "n".repeat(60), "username": ""}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let expected = btreemap! {
        "name" => vec!["Ensure this field has no more than 50 characters."],
        "query_comment" => vec!["This field is required."],
        "username" => vec!["This field may not be blank."],
    };
    assert_eq!(body, json!(expected));

    let (_, body) = get(&app.router, "/api/db/get/queries").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn missing_query_is_404() {
    let app = test_app();
    let (status, body) = get(&app.router, "/api/db/get/query/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "Query 42 not found"}));
}

#[tokio::test]
async fn comments_thread_newest_first() {
    let app = test_app();
    post_json(&app.router, "/api/db/post/query", query_body("daily")).await;

    let (status, body) = post(&app.router, "/api/db/post/comment/1/luis/looks%20right").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "Data saved successfully"}));
    post(&app.router, "/api/db/post/comment/1/ana/thanks").await;

    let (status, body) = get(&app.router, "/api/db/get/comments/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"id": 2, "query": 1, "username": "ana", "comment_text": "thanks"},
            {"id": 1, "query": 1, "username": "luis", "comment_text": "looks right"},
        ])
    );

    let (_, body) = get(&app.router, "/api/db/get/comments/9").await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn comment_on_unknown_query_is_400() {
    let app = test_app();

    let (status, body) = post(&app.router, "/api/db/post/comment/7/luis/hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"query": ["Invalid pk \"7\" - object does not exist."]}));

    let (status, body) = post(&app.router, "/api/db/post/comment/seven/luis/hello").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"query": ["Incorrect type. Expected pk value, received str."]})
    );
}
