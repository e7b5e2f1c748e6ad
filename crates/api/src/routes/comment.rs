//! Route definitions for the `/comments` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::comment;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// GET    /?task={id} | ?project={id}   -> list
/// POST   /                             -> create
/// PUT    /{id}                         -> update
/// DELETE /{id}                         -> delete (soft)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(comment::list).post(comment::create))
        .route("/{id}", put(comment::update).delete(comment::delete))
}
