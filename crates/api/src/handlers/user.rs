//! Handlers for the `/users` resource (operator management).
//!
//! All handlers require an admin operator via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use repairdesk_core::error::CoreError;
use repairdesk_core::types::DbId;
use repairdesk_core::validation::{
    parse_id, required_text, validate_password_strength, MAX_NAME_LENGTH, MIN_PASSWORD_LENGTH,
};
use repairdesk_db::models::user::{CreateUser, UpdateUser, UserResponse};
use repairdesk_db::repositories::{SessionRepo, UserRepo};
use serde::Deserialize;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub is_admin: Option<bool>,
    pub is_active: Option<bool>,
}

/// Request body for `POST /users/{id}/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub new_password: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let username = required_text("username", &input.username, MAX_NAME_LENGTH)?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username,
            password_hash,
            is_admin: input.is_admin,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, created_by = admin.user_id, "Operator created");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.iter().map(UserResponse::from).collect(),
    }))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(raw_id): Path<String>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_id("user", &raw_id)?;
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(UserResponse::from(&user)))
}

/// PUT /api/users/{id}
///
/// Updates profile fields, not the password. An admin cannot demote or
/// deactivate their own account.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw_id): Path<String>,
    AppJson(input): AppJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let id = parse_id("user", &raw_id)?;

    if id == admin.user_id && (input.is_admin == Some(false) || input.is_active == Some(false)) {
        return Err(AppError::BadRequest(
            "You cannot demote or deactivate your own account".into(),
        ));
    }

    let update = UpdateUser {
        username: input
            .username
            .as_deref()
            .map(|v| required_text("username", v, MAX_NAME_LENGTH))
            .transpose()?,
        is_admin: input.is_admin,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !user.is_active {
        SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    }
    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /api/users/{id}
///
/// Soft-deactivates the operator and revokes their sessions. Returns 204.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id("user", &raw_id)?;

    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "You cannot deactivate your own account".into(),
        ));
    }

    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(not_found(id));
    }
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, revoked, deactivated_by = admin.user_id, "Operator deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/users/{id}/reset-password
///
/// Also clears any login lock and signs the operator out everywhere.
pub async fn reset_password(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(raw_id): Path<String>,
    AppJson(input): AppJson<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    let id = parse_id("user", &raw_id)?;
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)?;

    let hashed = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    if !UserRepo::update_password(&state.pool, id, &hashed).await? {
        return Err(not_found(id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "User", id })
}
