//! Handlers for the `/auth` resource (login, refresh, logout, me).

use axum::extract::State;
use axum::http::header::{SET_COOKIE, USER_AGENT};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{AppendHeaders, IntoResponse};
use axum::Json;
use chrono::Utc;
use repairdesk_core::error::CoreError;
use repairdesk_db::models::session::CreateSession;
use repairdesk_db::models::user::{User, UserResponse};
use repairdesk_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Consecutive failed logins before the account is locked.
pub const MAX_FAILED_ATTEMPTS: i32 = 5;

/// Lock duration after too many failed logins.
pub const LOCK_DURATION_MINS: i64 = 15;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Body returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// `Set-Cookie` carrying the access token, plus the [`AuthResponse`] body.
pub type SessionResponse = (AppendHeaders<[(HeaderName, HeaderValue); 1]>, Json<AuthResponse>);

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<SessionResponse> {
    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    if user.locked_until.is_some_and(|until| until > Utc::now()) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is temporarily locked. Try again later.".into(),
        )));
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        let lock_until = Utc::now() + chrono::Duration::minutes(LOCK_DURATION_MINS);
        let failures =
            UserRepo::record_failed_login(&state.pool, user.id, MAX_FAILED_ATTEMPTS, lock_until)
                .await?;
        if failures >= MAX_FAILED_ATTEMPTS {
            tracing::warn!(user_id = user.id, failures, "Account locked after failed logins");
        }
        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;
    let pruned = SessionRepo::prune_for_user(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, pruned_sessions = pruned, "Operator signed in");

    start_session(&state, &user, user_agent(&headers)).await
}

/// POST /api/auth/refresh
///
/// Rotates the refresh token: the presented session is revoked and a new one
/// is issued. The access token of the old session stops working with it.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(input): AppJson<RefreshRequest>,
) -> AppResult<SessionResponse> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_active_by_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(invalid_refresh_token)?;

    // A concurrent refresh with the same token may have revoked it first.
    if !SessionRepo::revoke(&state.pool, session.id).await? {
        return Err(invalid_refresh_token());
    }

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    start_session(&state, &user, user_agent(&headers)).await
}

/// POST /api/auth/logout
///
/// Revokes every session of the operator and clears the cookie. Access tokens
/// of those sessions stop working at once. Returns 204.
pub async fn logout(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<impl IntoResponse> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth_user.user_id).await?;
    tracing::info!(user_id = auth_user.user_id, revoked, "Operator signed out");

    let cookie = state
        .config
        .session_cookie
        .cleared()
        .map_err(|e| AppError::InternalError(format!("Cookie encoding error: {e}")))?;

    Ok((StatusCode::NO_CONTENT, AppendHeaders([(SET_COOKIE, cookie)])))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Session has ended".into())))?;
    Ok(Json(UserResponse::from(&user)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid username or password".into(),
    ))
}

fn invalid_refresh_token() -> AppError {
    AppError::Core(CoreError::Unauthorized(
        "Invalid or expired refresh token".into(),
    ))
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.chars().take(255).collect())
}

/// Persist a refresh session, issue an access token bound to it, and attach
/// the session cookie.
async fn start_session(
    state: &AppState,
    user: &User,
    user_agent: Option<String>,
) -> AppResult<SessionResponse> {
    let jwt = &state.config.jwt;
    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let session = SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh_hash,
            expires_at: Utc::now() + chrono::Duration::days(jwt.refresh_token_expiry_days),
            user_agent,
            ip_address: None,
        },
    )
    .await?;

    let access_token =
        generate_access_token(user.id, &user.username, user.is_admin, session.id, jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    let expires_in = jwt.access_token_expiry_secs();
    let cookie = state
        .config
        .session_cookie
        .session(&access_token, expires_in)
        .map_err(|e| AppError::InternalError(format!("Cookie encoding error: {e}")))?;

    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(AuthResponse {
            access_token,
            refresh_token: refresh_plaintext,
            expires_in,
            user: UserResponse::from(user),
        }),
    ))
}
