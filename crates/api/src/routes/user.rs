//! Route definitions for the `/users` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// All routes require an admin operator (enforced by handler extractors).
///
/// ```text
/// GET    /                       -> list_users
/// POST   /                       -> create_user
/// GET    /{id}                   -> get_user
/// PUT    /{id}                   -> update_user
/// DELETE /{id}                   -> deactivate_user
/// POST   /{id}/reset-password    -> reset_password
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(user::list_users).post(user::create_user))
        .route(
            "/{id}",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::deactivate_user),
        )
        .route("/{id}/reset-password", post(user::reset_password))
}
