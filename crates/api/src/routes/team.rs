//! Route definitions for the `/teams` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::team;
use crate::state::AppState;

/// Routes mounted at `/teams`.
///
/// ```text
/// GET    /                         -> list
/// POST   /                         -> create
/// GET    /{id}                     -> get_by_id
/// PUT    /{id}                     -> update
///
/// POST   /{id}/members             -> add_member
/// DELETE /{id}/members/{user_id}   -> remove_member
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(team::list).post(team::create))
        .route("/{id}", get(team::get_by_id).put(team::update))
        .route("/{id}/members", post(team::add_member))
        .route("/{id}/members/{user_id}", delete(team::remove_member))
}
