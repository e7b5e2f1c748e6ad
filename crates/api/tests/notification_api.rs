//! HTTP-level integration tests for the notification inbox.

mod common;

use axum::http::StatusCode;
use common::{
    add_project_member, body_json, create_project, get_auth, post_auth, register,
};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_inbox_read_flow(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = register(&app, "owner").await;
    let member = register(&app, "member").await;
    let first = create_project(&app, &owner, "First").await;
    let second = create_project(&app, &owner, "Second").await;
    add_project_member(&app, &owner, first, &member).await;
    add_project_member(&app, &owner, second, &member).await;

    let response = get_auth(app.clone(), "/api/notifications/unread-count", &member.token).await;
    let json = body_json(response).await;
    assert_eq!(json["count"], 2);

    let json = body_json(get_auth(app.clone(), "/api/notifications", &member.token).await).await;
    let notifications = json["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 2);
    // Newest first.
    assert_eq!(notifications[0]["project_id"], second);
    let newest_id = notifications[0]["id"].as_i64().unwrap();

    // Someone else's notification looks missing.
    let response = post_auth(
        app.clone(),
        &format!("/api/notifications/{newest_id}/read"),
        &owner.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_auth(
        app.clone(),
        &format!("/api/notifications/{newest_id}/read"),
        &member.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(
        get_auth(app.clone(), "/api/notifications?unread_only=true", &member.token).await,
    )
    .await;
    assert_eq!(json["notifications"].as_array().unwrap().len(), 1);

    let response = post_auth(app.clone(), "/api/notifications/read-all", &member.token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get_auth(app, "/api/notifications/unread-count", &member.token).await)
        .await;
    assert_eq!(json["count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pagination(pool: PgPool) {
    let app = common::build_test_app(pool);
    let owner = register(&app, "owner").await;
    let member = register(&app, "member").await;
    for name in ["A", "B", "C"] {
        let project_id = create_project(&app, &owner, name).await;
        add_project_member(&app, &owner, project_id, &member).await;
    }

    let json = body_json(
        get_auth(app.clone(), "/api/notifications?limit=2&offset=2", &member.token).await,
    )
    .await;
    assert_eq!(json["notifications"].as_array().unwrap().len(), 1);

    let json = body_json(get_auth(app, "/api/notifications?limit=2", &member.token).await).await;
    assert_eq!(json["notifications"].as_array().unwrap().len(), 2);
}
