pub mod auth;
pub mod customer;
pub mod health;
pub mod job_card;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /auth/login                        login (public)
/// /auth/refresh                      refresh (public)
/// /auth/logout                       logout
/// /auth/me                           current operator
///
/// /job-cards                         list, create
/// /job-cards/summary                 counts per status
/// /job-cards/{id}                    get, update, delete
/// /job-cards/{id}/status             status change (PATCH)
///
/// /customers                         list, create
/// /customers/visit-counts            visit-count report
/// /customers/by-mobile/{mobile}      lookup by mobile
/// /customers/{id}                    get, update, delete
/// /customers/{id}/job-cards          job history
///
/// /users                             list, create (admin only)
/// /users/{id}                        get, update, deactivate
/// /users/{id}/reset-password         reset password
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/job-cards", job_card::router())
        .nest("/customers", customer::router())
        .nest("/users", user::router())
}
