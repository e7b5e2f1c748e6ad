//! Completion point awards.

use collabspace_core::gamification::{self, Award};
use collabspace_core::notification::NotificationDraft;
use collabspace_core::types::DbId;
use collabspace_db::repositories::UserRepo;

use crate::error::AppResult;
use crate::notifications::notify;
use crate::services::stats;
use crate::state::AppState;

/// Award `story_points * 10` points to a user for completing a task.
///
/// The increment and level recompute happen in a single `UPDATE`, so
/// concurrent awards to the same user all count. Sends a `level_up`
/// notification when the award raised the level, and recomputes the user's
/// teams so their `total_points` stay in sync. Returns `None` if the user no
/// longer exists.
pub async fn award_task_completion(
    state: &AppState,
    user_id: DbId,
    story_points: i32,
) -> AppResult<Option<Award>> {
    let delta = gamification::completion_award(story_points);
    let Some(points) = UserRepo::add_points(&state.pool, user_id, delta).await? else {
        tracing::warn!(user_id, "Completion award skipped, user not found");
        return Ok(None);
    };
    let award = Award::settled(points, delta);

    tracing::info!(
        user_id,
        points = award.points,
        awarded = delta,
        level = award.level,
        "Completion points awarded",
    );

    if award.leveled_up {
        notify(state, NotificationDraft::level_up(user_id, award.level)).await?;
    }

    stats::recompute_teams_for_user(&state.pool, user_id).await?;
    Ok(Some(award))
}
