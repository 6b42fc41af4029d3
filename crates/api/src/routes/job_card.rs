//! Route definitions for the `/job-cards` resource.

use axum::routing::{get, patch};
use axum::Router;

use crate::handlers::job_card;
use crate::state::AppState;

/// Routes mounted at `/job-cards`. Every route requires a session.
///
/// ```text
/// GET    /              -> list (?search=&status=&page=&pageSize=&limit=)
/// POST   /              -> create
/// GET    /summary       -> summary
/// GET    /{id}          -> get_by_id
/// PUT    /{id}          -> update
/// DELETE /{id}          -> delete
/// PATCH  /{id}/status   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(job_card::list).post(job_card::create))
        .route("/summary", get(job_card::summary))
        .route(
            "/{id}",
            get(job_card::get_by_id)
                .put(job_card::update)
                .delete(job_card::delete),
        )
        .route("/{id}/status", patch(job_card::update_status))
}
