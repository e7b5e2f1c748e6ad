//! Handlers for the caller's own `/notifications`.

use axum::extract::{Path, Query, State};
use axum::Json;
use collabspace_core::types::DbId;
use collabspace_db::models::notification::Notification;
use collabspace_db::repositories::NotificationRepo;

use crate::error::{not_found, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::NotificationQuery;
use crate::response::{MessageResponse, ResourceResponse};
use crate::state::AppState;

/// GET /api/notifications
///
/// Newest first. Expired notifications are never returned.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<NotificationQuery>,
) -> AppResult<Json<ResourceResponse<Vec<Notification>>>> {
    let page = params.page();
    let notifications = NotificationRepo::list_for_user(
        &state.pool,
        auth.user_id,
        params.unread_only,
        page.limit(),
        page.offset(),
    )
    .await?;
    Ok(Json(ResourceResponse::new("notifications", notifications)))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ResourceResponse<i64>>> {
    let count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(ResourceResponse::new("count", count)))
}

/// POST /api/notifications/{id}/read
///
/// Someone else's notification is reported as missing.
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !NotificationRepo::mark_read(&state.pool, id, auth.user_id).await? {
        return Err(not_found("Notification", id));
    }
    Ok(Json(MessageResponse::new("Notification marked as read")))
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<MessageResponse>> {
    let updated = NotificationRepo::mark_all_read(&state.pool, auth.user_id).await?;
    tracing::debug!(user_id = auth.user_id, updated, "Notifications marked as read");
    Ok(Json(MessageResponse::new("All notifications marked as read")))
}
