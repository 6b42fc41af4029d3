//! First-run operator account.

use repairdesk_core::error::CoreError;
use repairdesk_core::validation::{validate_password_strength, MIN_PASSWORD_LENGTH};
use repairdesk_db::models::user::{CreateUser, User};
use repairdesk_db::repositories::UserRepo;
use repairdesk_db::DbPool;

use crate::auth::password::hash_password;
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};

/// Create the configured admin when the `users` table is empty.
///
/// Returns the created user, or `None` when operators already exist.
pub async fn ensure_admin(pool: &DbPool, admin: &BootstrapAdmin) -> AppResult<Option<User>> {
    if UserRepo::count(pool).await? > 0 {
        return Ok(None);
    }

    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH).map_err(|e| match e {
        CoreError::Validation(msg) => {
            AppError::Core(CoreError::Validation(format!("ADMIN_PASSWORD: {msg}")))
        }
        other => AppError::Core(other),
    })?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: admin.username.clone(),
            password_hash,
            is_admin: true,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Created initial admin operator");
    Ok(Some(user))
}
