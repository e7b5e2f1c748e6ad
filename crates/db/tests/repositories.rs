//! Integration tests for the repository layer against a real database.

use assert_matches::assert_matches;
use collabspace_core::comment::CommentTarget;
use collabspace_core::notification::NotificationDraft;
use collabspace_core::priority::Priority;
use collabspace_core::project::ProjectStatus;
use collabspace_core::roles::{ProjectRole, TeamRole};
use collabspace_core::stats::{ProjectRollup, TeamRollup};
use collabspace_core::task::{ChecklistItem, TaskCategory, TaskStatus};
use collabspace_core::team::{TeamCategory, TeamSettings};
use collabspace_db::models::comment::CreateComment;
use collabspace_db::models::project::{CreateProject, ProjectFilter, UpdateProject};
use collabspace_db::models::task::{CreateTask, TaskChanges, TaskFilter};
use collabspace_db::models::team::CreateTeam;
use collabspace_db::models::user::{CreateUser, UpdateProfile};
use collabspace_db::repositories::{
    CommentRepo, NotificationRepo, ProjectRepo, TaskRepo, TeamRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: "hash".to_string(),
        first_name: None,
        last_name: None,
        avatar: "avatar".to_string(),
    };
    UserRepo::create(pool, &input).await.unwrap().id
}

async fn new_project(pool: &PgPool, owner_id: i64, name: &str) -> i64 {
    let input = CreateProject {
        name: name.to_string(),
        owner_id,
        ..Default::default()
    };
    let project = ProjectRepo::create(pool, &input).await.unwrap();
    ProjectRepo::add_member(pool, project.id, owner_id, ProjectRole::Owner)
        .await
        .unwrap();
    project.id
}

fn new_task(project_id: i64, created_by: i64, title: &str) -> CreateTask {
    CreateTask {
        title: title.to_string(),
        description: None,
        project_id,
        assigned_to: Some(created_by),
        created_by,
        status: TaskStatus::Todo,
        priority: Priority::Medium,
        category: TaskCategory::Other,
        start_date: None,
        due_date: None,
        completed_at: None,
        estimated_hours: None,
        actual_hours: 0.0,
        story_points: 3,
        dependencies: Vec::new(),
        blocked_by: Vec::new(),
        checklist: Vec::new(),
        tags: vec!["backend".to_string()],
        progress: 0,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_create_and_lookup(pool: PgPool) {
    let id = new_user(&pool, "ada").await;

    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(user.username, "ada");
    assert_eq!(user.points, 0);
    assert_eq!(user.level, 1);
    assert!(user.preferences.notifications.email);

    let by_email = UserRepo::find_by_email(&pool, "ADA@example.com").await.unwrap();
    assert_eq!(by_email.map(|u| u.id), Some(id));
    assert!(UserRepo::username_exists(&pool, "ada").await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_username_violates_unique_constraint(pool: PgPool) {
    new_user(&pool, "ada").await;
    let input = CreateUser {
        username: "ada".to_string(),
        email: "other@example.com".to_string(),
        password_hash: "hash".to_string(),
        first_name: None,
        last_name: None,
        avatar: "avatar".to_string(),
    };
    let err = UserRepo::create(&pool, &input).await.unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("uq_users_username")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_profile_update_keeps_unspecified_fields(pool: PgPool) {
    let id = new_user(&pool, "ada").await;
    let input = UpdateProfile {
        first_name: Some("Ada".to_string()),
        skills: Some(vec!["rust".to_string()]),
        ..Default::default()
    };
    let user = UserRepo::update_profile(&pool, id, &input).await.unwrap().unwrap();
    assert_eq!(user.first_name.as_deref(), Some("Ada"));
    assert_eq!(user.avatar, "avatar");
    assert_eq!(user.skills, vec!["rust".to_string()]);
    assert_eq!(user.full_name(), "Ada");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_add_points_recomputes_level(pool: PgPool) {
    let id = new_user(&pool, "ada").await;
    assert_eq!(UserRepo::add_points(&pool, id, 90).await.unwrap(), Some(90));
    assert_eq!(UserRepo::add_points(&pool, id, 130).await.unwrap(), Some(220));

    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(user.points, 220);
    assert_eq!(user.level, 3);
    assert_eq!(UserRepo::add_points(&pool, 9999, 10).await.unwrap(), None);

    // A stored level out of step with the points is corrected by the next award.
    sqlx::query("UPDATE users SET level = 7 WHERE id = $1")
        .bind(id)
        .execute(&pool)
        .await
        .unwrap();
    UserRepo::add_points(&pool, id, 10).await.unwrap();
    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(user.level, 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_point_awards_all_land(pool: PgPool) {
    let id = new_user(&pool, "ada").await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let pool = pool.clone();
            tokio::spawn(async move { UserRepo::add_points(&pool, id, 10).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_some());
    }

    let user = UserRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(user.points, 100);
    assert_eq!(user.level, 2);
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_visibility_follows_membership(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let member = new_user(&pool, "member").await;
    let outsider = new_user(&pool, "outsider").await;
    let project_id = new_project(&pool, owner, "Apollo").await;
    ProjectRepo::add_member(&pool, project_id, member, ProjectRole::Member)
        .await
        .unwrap();

    let filter = ProjectFilter::default();
    assert_eq!(ProjectRepo::list_visible(&pool, owner, &filter).await.unwrap().len(), 1);
    assert_eq!(ProjectRepo::list_visible(&pool, member, &filter).await.unwrap().len(), 1);
    assert!(ProjectRepo::list_visible(&pool, outsider, &filter).await.unwrap().is_empty());

    let filter = ProjectFilter {
        status: Some(ProjectStatus::Active),
        ..Default::default()
    };
    assert!(ProjectRepo::list_visible(&pool, owner, &filter).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_adding_existing_member_is_noop(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let project_id = new_project(&pool, owner, "Apollo").await;

    let added = ProjectRepo::add_member(&pool, project_id, owner, ProjectRole::Admin)
        .await
        .unwrap();
    assert!(!added);
    let members = ProjectRepo::list_members(&pool, project_id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].role, ProjectRole::Owner);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_update_and_stats(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let project_id = new_project(&pool, owner, "Apollo").await;

    let update = UpdateProject {
        status: Some(ProjectStatus::OnHold),
        priority: Some(Priority::Urgent),
        ..Default::default()
    };
    let project = ProjectRepo::update(&pool, project_id, &update).await.unwrap().unwrap();
    assert_eq!(project.name, "Apollo");
    assert_eq!(project.status, ProjectStatus::OnHold);
    assert_eq!(project.priority, Priority::Urgent);

    let rollup = ProjectRollup::compute([TaskStatus::Completed, TaskStatus::Todo], 1);
    ProjectRepo::update_stats(&pool, project_id, &rollup).await.unwrap();
    let project = ProjectRepo::find_by_id(&pool, project_id).await.unwrap().unwrap();
    assert_eq!(project.stats.total_tasks, 2);
    assert_eq!(project.stats.completed_tasks, 1);
    assert_eq!(project.stats.total_members, 1);
    assert_eq!(project.progress, 50);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_project_delete_requires_tasks_removed_first(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let project_id = new_project(&pool, owner, "Apollo").await;
    TaskRepo::create(&pool, &new_task(project_id, owner, "One")).await.unwrap();
    TaskRepo::create(&pool, &new_task(project_id, owner, "Two")).await.unwrap();

    assert!(ProjectRepo::delete(&pool, project_id).await.is_err());

    let removed = TaskRepo::delete_by_project(&pool, project_id).await.unwrap();
    assert_eq!(removed, 2);
    assert!(ProjectRepo::delete(&pool, project_id).await.unwrap());
    assert!(ProjectRepo::find_by_id(&pool, project_id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_round_trips_json_and_arrays(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let project_id = new_project(&pool, owner, "Apollo").await;
    let mut input = new_task(project_id, owner, "Checklist");
    input.checklist = vec![ChecklistItem {
        text: "write".to_string(),
        completed: true,
        completed_at: None,
    }];
    input.status = TaskStatus::InReview;

    let task = TaskRepo::create(&pool, &input).await.unwrap();
    assert_eq!(task.status, TaskStatus::InReview);
    assert_eq!(task.checklist.len(), 1);
    assert!(task.checklist[0].completed);
    assert_eq!(task.tags, vec!["backend".to_string()]);
    assert_eq!(task.last_activity_by, Some(owner));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_completion_is_claimed_once(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let project_id = new_project(&pool, owner, "Apollo").await;
    let task = TaskRepo::create(&pool, &new_task(project_id, owner, "Ship")).await.unwrap();

    assert!(TaskRepo::claim_completion(&pool, task.id).await.unwrap());
    assert!(!TaskRepo::claim_completion(&pool, task.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_update_writes_back_changes(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let other = new_user(&pool, "other").await;
    let project_id = new_project(&pool, owner, "Apollo").await;
    let task = TaskRepo::create(&pool, &new_task(project_id, owner, "Ship")).await.unwrap();

    let mut changes = TaskChanges::from_task(&task, other);
    changes.status = TaskStatus::InProgress;
    changes.assigned_to = None;
    changes.progress = 40;
    let updated = TaskRepo::update(&pool, task.id, &changes).await.unwrap().unwrap();

    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.assigned_to, None);
    assert_eq!(updated.progress, 40);
    assert_eq!(updated.last_activity_by, Some(other));
    assert!(updated.last_activity_at >= task.last_activity_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_task_list_is_restricted_to_visible_projects(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let apollo = new_project(&pool, owner, "Apollo").await;
    let gemini = new_project(&pool, owner, "Gemini").await;
    TaskRepo::create(&pool, &new_task(apollo, owner, "A")).await.unwrap();
    TaskRepo::create(&pool, &new_task(gemini, owner, "B")).await.unwrap();

    let filter = TaskFilter {
        visible_projects: vec![apollo],
        ..Default::default()
    };
    let tasks = TaskRepo::list(&pool, &filter).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "A");

    let filter = TaskFilter {
        visible_projects: vec![apollo, gemini],
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    assert!(TaskRepo::list(&pool, &filter).await.unwrap().is_empty());

    let statuses = TaskRepo::statuses_for_projects(&pool, &[apollo, gemini]).await.unwrap();
    assert_eq!(statuses, vec![TaskStatus::Todo, TaskStatus::Todo]);
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_team_members_and_points(pool: PgPool) {
    let lead = new_user(&pool, "lead").await;
    let member = new_user(&pool, "member").await;
    UserRepo::add_points(&pool, member, 70).await.unwrap();

    let team = TeamRepo::create(
        &pool,
        &CreateTeam {
            name: "Core".to_string(),
            description: None,
            lead_id: lead,
            category: TeamCategory::Development,
            avatar: "avatar".to_string(),
            settings: TeamSettings::default(),
        },
    )
    .await
    .unwrap();
    TeamRepo::add_member(&pool, team.id, lead, TeamRole::Lead).await.unwrap();
    TeamRepo::add_member(&pool, team.id, member, TeamRole::Member).await.unwrap();

    let mut points = TeamRepo::member_points(&pool, team.id).await.unwrap();
    points.sort();
    assert_eq!(points, vec![0, 70]);
    assert_eq!(TeamRepo::ids_for_member(&pool, member).await.unwrap(), vec![team.id]);

    let rollup = TeamRollup::compute([], [], points);
    TeamRepo::update_stats(&pool, team.id, &rollup).await.unwrap();
    let team = TeamRepo::find_by_id(&pool, team.id).await.unwrap().unwrap();
    assert_eq!(team.stats.total_points, 70);

    assert!(TeamRepo::remove_member(&pool, team.id, member).await.unwrap());
    assert!(TeamRepo::list_for_user(&pool, member).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Comments & notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_deleted_comments_leave_the_count(pool: PgPool) {
    let owner = new_user(&pool, "owner").await;
    let project_id = new_project(&pool, owner, "Apollo").await;
    let task = TaskRepo::create(&pool, &new_task(project_id, owner, "Ship")).await.unwrap();

    let mut ids = Vec::new();
    for content in ["first", "second"] {
        let comment = CommentRepo::create(
            &pool,
            &CreateComment {
                content: content.to_string(),
                author_id: owner,
                target: CommentTarget::Task(task.id),
                parent_comment_id: None,
                mentions: Vec::new(),
            },
        )
        .await
        .unwrap();
        ids.push(comment.id);
    }
    assert_eq!(TaskRepo::refresh_comments_count(&pool, task.id).await.unwrap(), 2);

    assert!(CommentRepo::soft_delete(&pool, ids[0]).await.unwrap());
    assert_eq!(TaskRepo::refresh_comments_count(&pool, task.id).await.unwrap(), 1);
    assert!(CommentRepo::find_by_id(&pool, ids[0]).await.unwrap().is_none());
    assert_eq!(CommentRepo::list_for_task(&pool, task.id).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expired_notifications_are_hidden_and_purged(pool: PgPool) {
    let user = new_user(&pool, "ada").await;
    let live = NotificationRepo::create(&pool, &NotificationDraft::level_up(user, 2))
        .await
        .unwrap();
    let stale = NotificationRepo::create(&pool, &NotificationDraft::level_up(user, 3))
        .await
        .unwrap();
    sqlx::query("UPDATE notifications SET expires_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(stale.id)
        .execute(&pool)
        .await
        .unwrap();

    let listed = NotificationRepo::list_for_user(&pool, user, false, 50, 0).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, live.id);
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 1);

    assert_eq!(NotificationRepo::purge_expired(&pool).await.unwrap(), 1);
    assert!(NotificationRepo::mark_read(&pool, live.id, user).await.unwrap());
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 0);
}
