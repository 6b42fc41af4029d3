//! Session extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use repairdesk_core::error::CoreError;
use repairdesk_core::types::DbId;

use repairdesk_db::repositories::UserRepo;

use crate::auth::cookie::read_cookie;
use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// The operator behind the current request.
///
/// The session token is taken from an `Authorization: Bearer` header when one
/// is present, otherwise from the session cookie. A token only counts while
/// its session is live and the operator is active, so logout, deactivation
/// and password resets take effect immediately. Username and admin flag come
/// from the database, not from the token.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The operator's database id (from `claims.sub`).
    pub user_id: DbId,
    pub username: String,
    pub is_admin: bool,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(AUTHORIZATION) {
            Some(header) => header
                .to_str()
                .ok()
                .and_then(|v| v.strip_prefix("Bearer "))
                .ok_or_else(|| {
                    AppError::Core(CoreError::Unauthorized(
                        "Invalid Authorization format. Expected: Bearer <token>".into(),
                    ))
                })?,
            None => read_cookie(&parts.headers, &state.config.session_cookie.name).ok_or_else(
                || AppError::Core(CoreError::Unauthorized("Not signed in".into())),
            )?,
        };

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired session".into()))
        })?;

        let user = UserRepo::find_by_live_session(&state.pool, claims.sub, claims.sid)
            .await?
            .ok_or_else(|| AppError::Core(CoreError::Unauthorized("Session has ended".into())))?;

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        })
    }
}
