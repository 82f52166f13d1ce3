mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use common::TestApp;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::util::ServiceExt;
use user_service::models::User;
use user_service::services::UserRepository;
use user_service::startup::build_router;
use user_service::AppState;

fn app() -> (Router, Arc<UserRepository>) {
    let users = Arc::new(UserRepository::new());
    let router = build_router(AppState::new(Arc::clone(&users)));
    (router, users)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to execute request");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = serde_json::from_slice(&body).expect("Response body should be JSON");
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_with_type(content_type: &str, body: &'static str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/users")
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn list_returns_seed_users() {
    let (app, _) = app();

    let (status, body) = send(&app, get("/api/users")).await;

    assert_eq!(status, StatusCode::OK);
    let users = body.as_array().expect("body should be an array");
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["id"], 1);
    assert_eq!(users[0]["name"], "John Doe");
    assert_eq!(users[0]["email"], "john@example.com");
    assert!(users[0]["createdAt"].is_string());
    assert_eq!(users[1]["name"], "Jane Smith");
}

#[tokio::test]
async fn get_by_valid_id_returns_user() {
    let (app, _) = app();

    let (status, body) = send(&app, get("/api/users/1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["name"], "John Doe");
    assert_eq!(body["email"], "john@example.com");
}

#[tokio::test]
async fn get_with_non_numeric_id_is_400() {
    let (app, _) = app();

    for uri in ["/api/users/invalid", "/api/users/abc12", "/api/users/-x", "/api/users/%FF"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body, json!({ "error": "Invalid user ID" }), "{uri}");
    }
}

#[tokio::test]
async fn get_reads_the_leading_integer_of_the_id() {
    let (app, _) = app();

    for uri in ["/api/users/1abc", "/api/users/1.5", "/api/users/01"] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["id"], 1, "{uri}");
        assert_eq!(body["name"], "John Doe", "{uri}");
    }
}

#[tokio::test]
async fn get_unknown_id_is_404() {
    let (app, _) = app();

    for uri in [
        "/api/users/999",
        "/api/users/-1",
        "/api/users/99999999999999999999",
    ] {
        let (status, body) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "error": "User not found" }), "{uri}");
    }
}

#[tokio::test]
async fn get_after_programmatic_delete_is_404() {
    let (app, users) = app();
    assert!(users.delete_by_id(2));

    let (status, body) = send(&app, get("/api/users/2")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn create_with_valid_data_is_201() {
    let (app, users) = app();

    let (status, body) = send(
        &app,
        post_json(json!({ "name": "Test User", "email": "test@example.com" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 3);
    assert_eq!(body["name"], "Test User");
    assert_eq!(body["email"], "test@example.com");

    let created: User = serde_json::from_value(body).expect("body should be a user");
    assert_eq!(users.get_by_id(3), Some(created));
    assert_eq!(users.list_all().len(), 3);
}

#[tokio::test]
async fn created_user_is_returned_by_get_and_list() {
    let (app, _) = app();

    let (_, created) = send(
        &app,
        post_json(json!({ "name": "Alice Johnson", "email": "alice@example.com" })),
    )
    .await;

    let (status, fetched) = send(&app, get("/api/users/3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (_, list) = send(&app, get("/api/users")).await;
    assert_eq!(list.as_array().map(Vec::len), Some(3));
    assert_eq!(list[2], created);
}

#[tokio::test]
async fn create_ignores_unknown_fields() {
    let (app, _) = app();

    let (status, body) = send(
        &app,
        post_json(json!({ "name": "Test User", "email": "test@example.com", "id": 42 })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 3);
}

#[tokio::test]
async fn create_rejections_report_first_failing_rule() {
    let cases = [
        (json!({ "email": "test@example.com" }), "Name and email are required"),
        (json!({ "name": "Test User" }), "Name and email are required"),
        (json!({ "name": "", "email": "test@example.com" }), "Name and email are required"),
        (json!({ "name": null, "email": "test@example.com" }), "Name and email are required"),
        (json!({ "name": 123, "email": "test@example.com" }), "Name and email must be strings"),
        (json!({ "name": "Test User", "email": 123 }), "Name and email must be strings"),
        (json!({ "name": "Test User", "email": "invalid-email" }), "Invalid email format"),
        (json!({ "name": "Test User", "email": "test@example" }), "Invalid email format"),
    ];

    let (app, users) = app();
    for (payload, expected) in cases {
        let (status, body) = send(&app, post_json(payload.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{payload}");
        assert_eq!(body, json!({ "error": expected }), "{payload}");
    }

    assert_eq!(users.list_all().len(), 2, "rejected requests must not store users");
}

#[tokio::test]
async fn create_with_malformed_json_is_400() {
    let (app, _) = app();

    for raw in ["{\"name\": ", "null", "\"just a string\""] {
        let request = Request::builder()
            .method("POST")
            .uri("/api/users")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{raw}");
        assert_eq!(body["error"], "Invalid JSON body");
    }
}

#[tokio::test]
async fn create_with_json_array_body_has_no_fields() {
    let (app, users) = app();

    let (status, body) = send(&app, post_json(json!(["Mallory", "mallory@example.com"]))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Name and email are required" }));
    assert_eq!(users.list_all().len(), 2);
}

#[tokio::test]
async fn create_from_urlencoded_form_is_201() {
    let (app, users) = app();

    let request = post_with_type(
        "application/x-www-form-urlencoded",
        "name=Test+User&email=test%40example.com",
    );

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 3);
    assert_eq!(body["name"], "Test User");
    assert_eq!(body["email"], "test@example.com");
    assert_eq!(users.list_all().len(), 3);
}

#[tokio::test]
async fn create_from_form_with_repeated_name_is_not_strings() {
    let (app, _) = app();

    let request = post_with_type(
        "application/x-www-form-urlencoded",
        "name=A&name=B&email=test%40example.com",
    );

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and email must be strings");
}

#[tokio::test]
async fn create_with_unparsed_content_type_is_treated_as_empty() {
    let (app, users) = app();

    for content_type in [None, Some("text/plain")] {
        let request = match content_type {
            Some(content_type) => {
                post_with_type(content_type, "name=Test&email=test@example.com")
            }
            None => Request::builder()
                .method("POST")
                .uri("/api/users")
                .body(Body::from("name=Test&email=test@example.com"))
                .unwrap(),
        };

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{content_type:?}");
        assert_eq!(body["error"], "Name and email are required", "{content_type:?}");
    }

    assert_eq!(users.list_all().len(), 2);
}

#[tokio::test]
async fn ids_keep_increasing_across_requests_over_http() {
    let app = TestApp::spawn().await;

    let mut last_id = 2;
    for i in 0..3 {
        let response = app
            .client()
            .post(app.url("/api/users"))
            .json(&json!({ "name": format!("User {i}"), "email": format!("user{i}@example.com") }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), 201);

        let user: User = response.json().await.expect("Failed to parse user");
        assert!(user.id > last_id);
        last_id = user.id;
    }

    assert!(app.state.users.delete_by_id(last_id));

    let response = app
        .client()
        .get(app.url(&format!("/api/users/{}", last_id)))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), 404);

    let response = app
        .client()
        .post(app.url("/api/users"))
        .json(&json!({ "name": "Late User", "email": "late@example.com" }))
        .send()
        .await
        .expect("Failed to execute request");
    let user: User = response.json().await.expect("Failed to parse user");
    assert_eq!(user.id, last_id + 1);
}
