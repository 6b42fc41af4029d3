//! Route definitions for the `/customers` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::customer;
use crate::state::AppState;

/// Routes mounted at `/customers`. Every route requires a session.
///
/// ```text
/// GET    /                      -> list (?search=&page=&pageSize=&limit=)
/// POST   /                      -> create
/// GET    /visit-counts          -> visit_counts
/// GET    /by-mobile/{mobile}    -> get_by_mobile
/// GET    /{id}                  -> get_by_id
/// PUT    /{id}                  -> update
/// DELETE /{id}                  -> delete
/// GET    /{id}/job-cards        -> job_cards (?search=&status=&page=&pageSize=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(customer::list).post(customer::create))
        .route("/visit-counts", get(customer::visit_counts))
        .route("/by-mobile/{mobile}", get(customer::get_by_mobile))
        .route(
            "/{id}",
            get(customer::get_by_id)
                .put(customer::update)
                .delete(customer::delete),
        )
        .route("/{id}/job-cards", get(customer::job_cards))
}
