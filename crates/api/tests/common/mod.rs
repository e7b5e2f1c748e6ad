#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::Arc;
use tower::ServiceExt;

use collabspace_api::auth::jwt::JwtConfig;
use collabspace_api::config::ServerConfig;
use collabspace_api::router::build_app_router;
use collabspace_api::state::AppState;

/// Password used by every user registered through [`register`].
pub const TEST_PASSWORD: &str = "secret123";

/// Build a test `ServerConfig` with safe defaults.
///
/// The database URL is unused; tests hand the router the pool created by
/// `#[sqlx::test]`.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        frontend_url: "http://localhost:3000".to_string(),
        database_url: String::new(),
        db_max_connections: 5,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            expiry_hours: 1,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool. Email delivery is disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: None,
    };
    build_app_router(state, &config).expect("test config has valid CORS origins")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A user registered through the API.
pub struct TestUser {
    pub id: i64,
    pub token: String,
}

/// Register `username` with [`TEST_PASSWORD`] and return its id and token.
pub async fn register(app: &Router, username: &str) -> TestUser {
    let body = json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": TEST_PASSWORD,
    });
    let response = post_json(app.clone(), "/api/auth/register", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    TestUser {
        id: json["user"]["id"].as_i64().unwrap(),
        token: json["token"].as_str().unwrap().to_string(),
    }
}

/// Create a project owned by `owner` and return its id.
pub async fn create_project(app: &Router, owner: &TestUser, name: &str) -> i64 {
    let response =
        post_json_auth(app.clone(), "/api/projects", &owner.token, json!({ "name": name })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["project"]["id"].as_i64().unwrap()
}

/// Add `user` to a project as a plain member.
pub async fn add_project_member(app: &Router, owner: &TestUser, project_id: i64, user: &TestUser) {
    add_project_member_as(app, owner, project_id, user, "member").await;
}

/// Add `user` to a project with the given role.
pub async fn add_project_member_as(
    app: &Router,
    owner: &TestUser,
    project_id: i64,
    user: &TestUser,
    role: &str,
) {
    let response = post_json_auth(
        app.clone(),
        &format!("/api/projects/{project_id}/members"),
        &owner.token,
        json!({ "user_id": user.id, "role": role }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

/// Create a task in `project_id` and return the task JSON.
pub async fn create_task(app: &Router, user: &TestUser, project_id: i64, extra: Value) -> Value {
    let mut body = json!({ "title": "Task", "project_id": project_id });
    if let (Some(target), Some(fields)) = (body.as_object_mut(), extra.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    let response = post_json_auth(app.clone(), "/api/tasks", &user.token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["task"].clone()
}
