//! Handlers for the `/auth` resource (registration, login, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use collabspace_core::error::CoreError;
use collabspace_core::priority::Priority;
use collabspace_core::project::ProjectStatus;
use collabspace_core::team::TeamCategory;
use collabspace_core::types::DbId;
use collabspace_core::user::{self, PreferencesPatch};
use collabspace_db::models::project::ProjectFilter;
use collabspace_db::models::user::{CreateUser, UpdateProfile, User};
use collabspace_db::repositories::{ProjectRepo, TeamRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, TokenSubject};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{not_found, AppError, AppResult};
use crate::extract::ValidatedJson;
use crate::middleware::auth::AuthUser;
use crate::response::{MessageResponse, ResourceResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 30, message = "Username must be 3-30 characters"))]
    pub username: String,
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    pub password: String,
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Please provide email and password"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please provide email and password"))]
    pub password: String,
}

/// Request body for `PUT /auth/profile`. Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(max = 50))]
    pub first_name: Option<String>,
    #[validate(length(max = 50))]
    pub last_name: Option<String>,
    #[validate(length(min = 1, max = 500))]
    pub avatar: Option<String>,
    #[validate(length(max = 500, message = "Bio cannot exceed 500 characters"))]
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub preferences: Option<PreferencesPatch>,
}

/// Request body for `PUT /auth/change-password`.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Please provide current and new password"))]
    pub current_password: String,
    pub new_password: String,
}

/// A user with the derived display name.
#[derive(Debug, Serialize)]
pub struct UserView {
    #[serde(flatten)]
    pub user: User,
    pub full_name: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            full_name: user.full_name(),
            user,
        }
    }
}

/// `{ success, message, token, user }` returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: &'static str,
    pub token: String,
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct TeamRef {
    pub id: DbId,
    pub name: String,
    pub avatar: String,
    pub category: TeamCategory,
}

#[derive(Debug, Serialize)]
pub struct ProjectRef {
    pub id: DbId,
    pub name: String,
    pub status: ProjectStatus,
    pub priority: Priority,
}

/// The caller's own profile with membership lists.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub user: UserView,
    pub teams: Vec<TeamRef>,
    pub projects: Vec<ProjectRef>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    validate_password_strength(&input.password).map_err(CoreError::Validation)?;

    let email = user::normalize_email(&input.email);
    let username = input.username.trim().to_string();

    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(CoreError::Validation("Email already registered".into()).into());
    }
    if UserRepo::username_exists(&state.pool, &username).await? {
        return Err(CoreError::Validation("Username already taken".into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let created = UserRepo::create(
        &state.pool,
        &CreateUser {
            avatar: user::default_avatar_url(&username),
            username,
            email,
            password_hash,
            first_name: input.first_name,
            last_name: input.last_name,
        },
    )
    .await?;

    tracing::info!(user_id = created.id, username = %created.username, "User registered");

    let token = issue_token(&state, &created)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully",
            token,
            user: created.into(),
        }),
    ))
}

/// POST /api/auth/login
///
/// Unknown email, wrong password, and a deactivated account are all 401.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &user::normalize_email(&input.email))
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(CoreError::Unauthorized("Account is deactivated".into()).into());
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    UserRepo::touch_last_active(&state.pool, user.id).await?;

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful",
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ResourceResponse<ProfileView>>> {
    let user = load_user(&state, auth.user_id).await?;

    let teams = TeamRepo::list_for_user(&state.pool, user.id)
        .await?
        .into_iter()
        .map(|t| TeamRef {
            id: t.id,
            name: t.name,
            avatar: t.avatar,
            category: t.category,
        })
        .collect();
    let projects = ProjectRepo::list_visible(&state.pool, user.id, &ProjectFilter::default())
        .await?
        .into_iter()
        .map(|p| ProjectRef {
            id: p.id,
            name: p.name,
            status: p.status,
            priority: p.priority,
        })
        .collect();

    Ok(Json(ResourceResponse::new(
        "user",
        ProfileView {
            user: user.into(),
            teams,
            projects,
        },
    )))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<ResourceResponse<UserView>>> {
    let current = load_user(&state, auth.user_id).await?;

    let changes = UpdateProfile {
        first_name: input.first_name,
        last_name: input.last_name,
        avatar: input.avatar,
        bio: input.bio,
        skills: input.skills,
        preferences: input.preferences.map(|patch| current.preferences.merge(patch)),
    };
    let updated = UserRepo::update_profile(&state.pool, auth.user_id, &changes)
        .await?
        .ok_or_else(|| not_found("User", auth.user_id))?;

    Ok(Json(
        ResourceResponse::new("user", UserView::from(updated))
            .with_message("Profile updated successfully"),
    ))
}

/// PUT /api/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    validate_password_strength(&input.new_password).map_err(CoreError::Validation)?;

    let user = load_user(&state, auth.user_id).await?;
    let matches = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !matches {
        return Err(CoreError::Unauthorized("Current password is incorrect".into()).into());
    }

    let new_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &new_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(Json(MessageResponse::new("Password changed successfully")))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized("Invalid credentials".into()))
}

async fn load_user(state: &AppState, user_id: DbId) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or_else(|| not_found("User", user_id))
}

fn issue_token(state: &AppState, user: &User) -> AppResult<String> {
    let subject = TokenSubject {
        user_id: user.id,
        username: &user.username,
        email: &user.email,
        role: user.role.as_str(),
    };
    generate_access_token(subject, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))
}
