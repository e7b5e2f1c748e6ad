pub mod analytics;
pub mod auth;
pub mod comment;
pub mod health;
pub mod notification;
pub mod project;
pub mod task;
pub mod team;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                    service and database health (public)
///
/// /auth/register                             register (public)
/// /auth/login                                login (public)
/// /auth/profile                              get, update own profile
/// /auth/change-password                      change own password
///
/// /projects                                  list, create
/// /projects/{id}                             get, update, delete
/// /projects/{id}/members                     add member
/// /projects/{id}/members/{user_id}           remove member
///
/// /tasks                                     list, create
/// /tasks/{id}                                get, update, delete
///
/// /teams                                     list, create
/// /teams/{id}                                get, update
/// /teams/{id}/members                        add member
/// /teams/{id}/members/{user_id}              remove member
///
/// /comments                                  list (?task= or ?project=), create
/// /comments/{id}                             edit, soft delete
///
/// /notifications                             list own
/// /notifications/unread-count                unread count
/// /notifications/read-all                    mark all read
/// /notifications/{id}/read                   mark one read
///
/// /analytics/dashboard                       per-user dashboard figures
/// ```
///
/// Everything except `/health`, `/auth/register` and `/auth/login` requires a
/// bearer token, enforced by the `AuthUser` extractor on each handler.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/auth", auth::router())
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
        .nest("/teams", team::router())
        .nest("/comments", comment::router())
        .nest("/notifications", notification::router())
        .nest("/analytics", analytics::router())
}
